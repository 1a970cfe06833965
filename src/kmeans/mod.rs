pub mod absorb;
pub use absorb::*;

pub mod bounds;
pub use bounds::*;

pub mod elkan;
pub use elkan::*;

pub mod fit;
pub use fit::*;

pub mod latent;
pub use latent::*;
