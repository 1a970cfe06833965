pub mod aggregator;
pub use aggregator::*;

pub mod bucket;
pub use bucket::*;

pub mod captions;
pub use captions::*;

pub mod classes;
pub use classes::*;

pub mod sample;
pub use sample::*;

pub mod source;
pub use source::*;
