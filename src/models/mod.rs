pub mod animation;
pub mod generation;
pub mod image;

pub use animation::*;
pub use generation::*;
pub use image::*;
