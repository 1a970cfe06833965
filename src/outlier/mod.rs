pub mod lof;
pub use lof::*;
