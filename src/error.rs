use thiserror::Error;

/// Failure conditions raised while distilling a class.
///
/// Per-class conditions ([`Error::InsufficientSamples`], [`Error::OracleFailure`])
/// are isolated: the class or sample is skipped and the run continues.
/// Everything else signals broken configuration or a broken bookkeeping
/// invariant and aborts the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("class {label} has {have} samples, needs at least {need}")]
    InsufficientSamples {
        label: String,
        have: usize,
        need: usize,
    },

    #[error("class {label} cluster {cluster} has no members")]
    EmptyCluster { label: String, cluster: usize },

    #[error("embedding dimension {dimension} is not 4 * N * N")]
    DimensionMismatch { dimension: usize },

    #[error("sample {identifier}: {reason}")]
    OracleFailure { identifier: String, reason: String },

    #[error("class {label} parallel arrays out of sync: {detail}")]
    Desync { label: String, detail: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the condition must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::InsufficientSamples { .. } | Self::OracleFailure { .. }
        )
    }

    pub(crate) fn oracle(identifier: impl Into<String>, reason: impl ToString) -> Self {
        Self::OracleFailure {
            identifier: identifier.into(),
            reason: reason.to_string(),
        }
    }
}
