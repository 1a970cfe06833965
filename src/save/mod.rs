pub mod artifacts;
pub use artifacts::*;

pub mod kind;
pub use kind::*;
