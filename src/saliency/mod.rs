pub mod common;
pub use common::*;

pub mod stopwords;
pub use stopwords::*;

pub mod summary;
pub use summary::*;

pub mod tokens;
pub use tokens::*;
