pub mod distiller;
pub use distiller::*;

pub mod prototype;
pub use prototype::*;

pub mod worker;
pub use worker::*;
