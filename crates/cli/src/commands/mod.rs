pub mod catalog;
pub mod image;
pub mod libraries;
pub mod project;
pub mod util;

pub use catalog::*;
pub use image::*;
pub use libraries::*;
pub use project::*;
pub use util::*;
