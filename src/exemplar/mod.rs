pub mod claims;
pub use claims::*;

pub mod exemplars;
pub use exemplars::*;

pub mod spatial;
pub use spatial::*;
