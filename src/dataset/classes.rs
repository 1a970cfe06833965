use crate::Error;
use crate::tokenize;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::path::Path;

/// A class label together with its human-readable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    key: String,
    name: String,
}

impl Class {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Words naming this class. Never salient for its own clusters.
    pub fn words(&self) -> BTreeSet<String> {
        tokenize(&self.key)
            .into_iter()
            .chain(tokenize(&self.name))
            .collect()
    }
}

impl From<&str> for Class {
    /// Parses `key[\tname]`; the name defaults to the key.
    fn from(line: &str) -> Self {
        let line = line.trim();
        match line.split_once('\t') {
            Some((key, name)) => Self::new(key.trim(), name.trim()),
            None => Self::new(line, line),
        }
    }
}

/// The fixed, ordered set of labels known up front.
#[derive(Debug, Clone, Default)]
pub struct Classes {
    order: Vec<Class>,
    index: HashMap<String, usize>,
}

impl Classes {
    /// Reads one class per non-empty line.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        let classes = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(Class::from)
            .collect::<Self>();
        match classes.is_empty() {
            true => Err(Error::Config("label file lists no classes".into())),
            false => Ok(classes),
        }
    }
    pub fn len(&self) -> usize {
        self.order.len()
    }
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Class> {
        self.order.iter()
    }
    pub fn get(&self, key: &str) -> Option<&Class> {
        self.position(key).map(|i| &self.order[i])
    }
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }
}

impl FromIterator<Class> for Classes {
    /// Later duplicates of a key are dropped.
    fn from_iter<T: IntoIterator<Item = Class>>(iter: T) -> Self {
        let mut classes = Self::default();
        for class in iter {
            if !classes.index.contains_key(class.key()) {
                classes
                    .index
                    .insert(class.key().to_string(), classes.order.len());
                classes.order.push(class);
            }
        }
        classes
    }
}
