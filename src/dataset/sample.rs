use serde::Deserialize;
use serde::Serialize;

/// Path segment after which identifiers become caption keys.
const TRAIN_SEGMENT: &str = "train/";

/// One embedded dataset item. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    identifier: String,
    label: String,
    text: String,
    latent: Vec<f32>,
    joint: Option<Vec<f32>>,
}

impl Sample {
    pub fn new(
        identifier: impl Into<String>,
        label: impl Into<String>,
        text: impl Into<String>,
        latent: Vec<f32>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            text: text.into(),
            latent,
            joint: None,
        }
    }

    /// Attach the optional joint (image-text) embedding.
    pub fn with_joint(self, joint: Vec<f32>) -> Self {
        Self {
            joint: Some(joint),
            ..self
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
    pub fn label(&self) -> &str {
        &self.label
    }
    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn latent(&self) -> &[f32] {
        &self.latent
    }
    pub fn joint(&self) -> Option<&[f32]> {
        self.joint.as_deref()
    }
    pub fn dimension(&self) -> usize {
        self.latent.len()
    }

    /// Caption key of this sample, see [`caption_key`].
    pub fn key(&self) -> &str {
        caption_key(&self.identifier)
    }

    /// First non-finite coordinate, if any.
    pub fn non_finite(&self) -> Option<usize> {
        self.latent
            .iter()
            .chain(self.joint.iter().flatten())
            .position(|x| !x.is_finite())
    }

    pub(crate) fn into_parts(self) -> (String, String, Vec<f32>, Option<Vec<f32>>) {
        (self.identifier, self.text, self.latent, self.joint)
    }
}

/// Dataset-relative key of a path: everything after the last `train/`,
/// or the whole path when there is none.
pub fn caption_key(identifier: &str) -> &str {
    identifier
        .rfind(TRAIN_SEGMENT)
        .map(|i| &identifier[i + TRAIN_SEGMENT.len()..])
        .unwrap_or(identifier)
}
