use crate::Captions;
use crate::Error;
use crate::Sample;
use crate::caption_key;
use rayon::prelude::*;
use serde::Deserialize;
use std::io::BufRead;

/// One batch of embedded samples, one entry per input in input order.
/// Entries that could not be embedded carry an [`Error::OracleFailure`].
pub type Batch = Vec<Result<Sample, Error>>;

/// Anything producing embedded batches in dataset order.
pub trait EmbeddingSource: Iterator<Item = Batch> {}
impl<T> EmbeddingSource for T where T: Iterator<Item = Batch> {}

/// Maps an image to its latent. Opaque to the engine.
pub trait ImageEncoder<I>: Sync {
    fn encode_image(&self, image: &I) -> anyhow::Result<Vec<f32>>;
}

/// Maps a caption to a joint image-text embedding. Opaque to the engine.
pub trait TextEmbedder: Sync {
    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// A raw dataset row awaiting embedding.
#[derive(Debug, Clone)]
pub struct Record<I> {
    pub path: String,
    pub label: String,
    pub text: String,
    pub image: I,
}

/// Runs the two independent oracle calls over a batch of records.
pub struct Extractor<'a, I> {
    image: &'a dyn ImageEncoder<I>,
    text: Option<&'a dyn TextEmbedder>,
}

impl<'a, I: Sync> Extractor<'a, I> {
    pub fn new(image: &'a dyn ImageEncoder<I>) -> Self {
        Self { image, text: None }
    }
    pub fn with_text(self, text: &'a dyn TextEmbedder) -> Self {
        Self {
            text: Some(text),
            ..self
        }
    }

    /// Embeds records concurrently; output order matches input order.
    pub fn extract(&self, batch: &[Record<I>]) -> Batch {
        batch.par_iter().map(|r| self.embed(r)).collect()
    }

    fn embed(&self, record: &Record<I>) -> Result<Sample, Error> {
        let latent = self
            .image
            .encode_image(&record.image)
            .map_err(|e| Error::oracle(&record.path, e))?;
        let sample = Sample::new(&record.path, &record.label, &record.text, latent);
        match self.text {
            None => Ok(sample),
            Some(embedder) => embedder
                .embed_text(&record.text)
                .map(|joint| sample.with_joint(joint))
                .map_err(|e| Error::oracle(&record.path, e)),
        }
    }
}

/// Precomputed embedding record, one JSON object per line.
#[derive(Debug, Deserialize)]
struct Line {
    path: String,
    label: Option<String>,
    text: Option<String>,
    embedding: Vec<f32>,
    joint: Option<Vec<f32>>,
}

/// Reads precomputed embeddings from JSON lines in fixed-size batches.
///
/// A missing `text` is looked up in the optional [`Captions`] under the
/// sample's key; a missing `label` is the first component of the key.
pub struct JsonlSource<R> {
    lines: std::io::Lines<R>,
    batch: usize,
    captions: Option<Captions>,
    row: usize,
}

impl<R: BufRead> JsonlSource<R> {
    pub fn new(reader: R, batch: usize) -> Self {
        Self {
            lines: reader.lines(),
            batch: batch.max(1),
            captions: None,
            row: 0,
        }
    }
    pub fn with_captions(self, captions: Captions) -> Self {
        Self {
            captions: Some(captions),
            ..self
        }
    }

    fn parse(&self, line: &str) -> Result<Sample, Error> {
        let row = format!("line {}", self.row);
        let line = serde_json::from_str::<Line>(line).map_err(|e| Error::oracle(&row, e))?;
        let key = caption_key(&line.path);
        let text = match line.text {
            Some(text) => text,
            None => self
                .captions
                .as_ref()
                .and_then(|c| c.get(key))
                .map(str::to_string)
                .ok_or_else(|| Error::oracle(&line.path, "no caption"))?,
        };
        let label = match line.label {
            Some(label) => label,
            None => key
                .split('/')
                .next()
                .filter(|l| !l.is_empty() && *l != key)
                .map(str::to_string)
                .ok_or_else(|| Error::oracle(&line.path, "no label"))?,
        };
        let sample = Sample::new(line.path, label, text, line.embedding);
        Ok(match line.joint {
            Some(joint) => sample.with_joint(joint),
            None => sample,
        })
    }
}

impl<R: BufRead> Iterator for JsonlSource<R> {
    type Item = Batch;
    fn next(&mut self) -> Option<Batch> {
        let mut batch = Batch::with_capacity(self.batch);
        while batch.len() < self.batch {
            let line = match self.lines.next() {
                None => break,
                Some(Err(e)) => {
                    batch.push(Err(Error::Io(e)));
                    break;
                }
                Some(Ok(line)) => line,
            };
            self.row += 1;
            if line.trim().is_empty() {
                continue;
            }
            batch.push(self.parse(&line));
        }
        match batch.is_empty() {
            true => None,
            false => Some(batch),
        }
    }
}
