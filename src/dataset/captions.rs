use crate::Error;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

#[derive(Deserialize)]
struct Meta {
    file_name: String,
    text: String,
}

/// Caption lookup keyed by dataset-relative file name.
#[derive(Debug, Clone, Default)]
pub struct Captions(BTreeMap<String, String>);

impl Captions {
    /// Reads `{"file_name": .., "text": ..}` lines. Blank lines are ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = std::io::BufReader::new(std::fs::File::open(path)?);
        let mut captions = BTreeMap::new();
        for line in file.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let meta = serde_json::from_str::<Meta>(&line)?;
            captions.insert(meta.file_name, meta.text);
        }
        log::info!("{:<32}{:<32}", "captions loaded", captions.len());
        Ok(Self(captions))
    }
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Captions
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_jsonl_metadata() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("meta.jsonl");
        std::fs::write(
            &path,
            "{\"file_name\": \"dingo/1.jpg\", \"text\": \"a dingo pup\"}\n\n\
             {\"file_name\": \"dingo/2.jpg\", \"text\": \"dingo at dusk\"}\n",
        )
        .expect("write");
        let captions = Captions::load(&path).expect("load");
        assert_eq!(captions.len(), 2);
        assert_eq!(captions.get("dingo/2.jpg"), Some("dingo at dusk"));
        assert_eq!(captions.get("dingo/3.jpg"), None);
    }

    #[test]
    fn malformed_metadata_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("meta.jsonl");
        std::fs::write(&path, "{\"file_name\": 3}\n").expect("write");
        assert!(matches!(Captions::load(&path), Err(Error::Json(_))));
    }
}
