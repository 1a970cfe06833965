use crate::Frequency;
use crate::Stopwords;
use crate::tokenize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Words shared by so many captions of a class that they say nothing about
/// any single cluster.
///
/// A word is common when the number of captions containing it at least
/// once reaches `threshold * captions.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonWords(BTreeSet<String>);

impl CommonWords {
    pub fn new<S: AsRef<str>>(captions: &[S], threshold: f32) -> Self {
        let cutoff = threshold as f64 * captions.len() as f64;
        let stopwords = Stopwords::english();
        captions
            .iter()
            .map(|caption| tokenize(caption.as_ref()))
            .map(|words| words.into_iter().collect::<BTreeSet<_>>())
            .fold(BTreeMap::<String, Frequency>::new(), |mut counts, words| {
                words
                    .into_iter()
                    .for_each(|word| *counts.entry(word).or_default() += 1);
                counts
            })
            .into_iter()
            .filter(|(_, count)| *count as f64 >= cutoff)
            .filter(|(word, _)| !stopwords.contains(word))
            .map(|(word, _)| word)
            .collect()
    }
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl FromIterator<String> for CommonWords {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
