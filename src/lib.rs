//! Per-class prototype synthesis for dataset distillation.
//!
//! Every labelled sample arrives as an image latent, an optional joint
//! embedding, a caption and a source path. For each class we
//!
//! 1. **Aggregate** samples into a [`ClassBucket`] of parallel arrays
//! 2. **Filter** low-density points with the local outlier factor
//! 3. **Cluster** the survivors into `ipc` groups with seeded k-means
//! 4. **Select** exemplars nearest each centroid
//! 5. **Summarize** each cluster's captions into one representative sentence
//!
//! and persist the resulting [`Prototype`]s as [`Artifacts`].
pub mod config;
pub mod dataset;
pub mod distill;
pub mod error;
pub mod exemplar;
pub mod kmeans;
pub mod outlier;
pub mod saliency;
pub mod save;


pub use config::*;
pub use dataset::*;
pub use distill::*;
pub use error::*;
pub use exemplar::*;
pub use kmeans::*;
pub use outlier::*;
pub use saliency::*;
pub use save::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Distances, inertia and outlier scores.
pub type Energy = f32;
/// Word counts inside a cluster or class.
pub type Frequency = usize;

// ============================================================================
// K-MEANS CLUSTERING
// ============================================================================
/// Independent k-means++ restarts; the lowest-inertia fit wins.
pub const KMEANS_RESTARTS: usize = 10;
/// Upper bound on Lloyd iterations per restart.
pub const KMEANS_ITERATIONS: usize = 300;
/// Convergence threshold on the largest centroid drift.
pub const KMEANS_TOLERANCE: Energy = 1e-6;

// ============================================================================
// OUTLIER FILTERING
// ============================================================================
/// Neighbourhood size for the local outlier factor.
pub const LOF_NEIGHBORS: usize = 10;
/// Keeps local reachability density finite for duplicated points.
pub const LOF_EPSILON: Energy = 1e-10;

// ============================================================================
// SALIENCY
// ============================================================================
/// Ranked words reported per cluster for diagnostics.
pub const SALIENCY_DIAGNOSTICS: usize = 20;
/// Latent channels of the spatial prototype tensor.
pub const LATENT_CHANNELS: usize = 4;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() -> anyhow::Result<()> {
    std::fs::create_dir_all("logs")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time))?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file])?;
    Ok(())
}
