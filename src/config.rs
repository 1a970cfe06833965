use crate::Error;
use crate::LOF_NEIGHBORS;
use serde::Deserialize;
use serde::Serialize;

/// Clustering knobs shared by every class worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterArgs {
    /// clusters (and prototypes) per class
    pub ipc: usize,
    /// fraction of each class discarded as outliers
    pub contamination: f32,
    /// seeds every k-means restart
    pub seed: u64,
    /// per-class sample cap as a multiple of ipc, 0 disables
    pub km_expand: usize,
    /// neighbourhood size for outlier scoring
    pub neighbors: usize,
}

impl Default for ClusterArgs {
    fn default() -> Self {
        Self {
            ipc: 1,
            contamination: 0.1,
            seed: 0,
            km_expand: 0,
            neighbors: LOF_NEIGHBORS,
        }
    }
}

impl ClusterArgs {
    pub fn validate(&self) -> Result<(), Error> {
        if self.ipc == 0 {
            return Err(Error::Config("ipc must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.contamination) {
            return Err(Error::Config(format!(
                "contamination {} outside [0, 1]",
                self.contamination
            )));
        }
        if self.neighbors == 0 {
            return Err(Error::Config("neighbors must be positive".into()));
        }
        Ok(())
    }

    /// Most samples a class may hold before filtering.
    pub fn capacity(&self) -> Option<usize> {
        match self.km_expand {
            0 => None,
            x => Some(x * self.ipc),
        }
    }
}

/// Caption summarization and exemplar knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextArgs {
    /// fraction of class captions a word must reach to count as common
    pub threshold: f32,
    /// salient words used to score candidate sentences
    pub tpk: usize,
    /// nearest captions kept per cluster
    pub k_text: usize,
    /// nearest images kept per cluster
    pub k_image: usize,
}

impl Default for TextArgs {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            tpk: 20,
            k_text: 1,
            k_image: 1,
        }
    }
}

impl TextArgs {
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::Config(format!(
                "threshold {} outside [0, 1]",
                self.threshold
            )));
        }
        if self.tpk == 0 {
            return Err(Error::Config("tpk must be positive".into()));
        }
        Ok(())
    }
}

/// Command-line options of the `distill` binary.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON lines of precomputed embeddings
    #[arg(long, required = true)]
    pub embeddings: std::path::PathBuf,
    /// one `key[\tname]` class per line
    #[arg(long, required = true)]
    pub labels: std::path::PathBuf,
    /// JSON lines of `{file_name, text}` caption metadata
    #[arg(long)]
    pub captions: Option<std::path::PathBuf>,
    #[arg(long, default_value = "prototypes")]
    pub save_prototype_path: std::path::PathBuf,
    #[arg(long, default_value = "imagenet")]
    pub dataset: String,
    #[arg(long, default_value_t = 256)]
    pub batch_size: usize,
    /// distill classes on the rayon pool
    #[arg(long)]
    pub parallel: bool,
    #[arg(long, default_value_t = 1)]
    pub ipc: usize,
    #[arg(long, default_value_t = 0.1)]
    pub contamination: f32,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    #[arg(long, default_value_t = 0)]
    pub km_expand: usize,
    #[arg(long, default_value_t = LOF_NEIGHBORS)]
    pub neighbors: usize,
    #[arg(long, default_value_t = 0.7)]
    pub threshold: f32,
    #[arg(long, default_value_t = 20)]
    pub tpk: usize,
    #[arg(long, default_value_t = 1)]
    pub k_text: usize,
    #[arg(long, default_value_t = 1)]
    pub k_image: usize,
}

#[cfg(feature = "cli")]
impl Args {
    pub fn cluster(&self) -> ClusterArgs {
        ClusterArgs {
            ipc: self.ipc,
            contamination: self.contamination,
            seed: self.seed,
            km_expand: self.km_expand,
            neighbors: self.neighbors,
        }
    }
    pub fn text(&self) -> TextArgs {
        TextArgs {
            threshold: self.threshold,
            tpk: self.tpk,
            k_text: self.k_text,
            k_image: self.k_image,
        }
    }
}
