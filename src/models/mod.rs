pub mod guide;
pub mod image;
pub mod text;

pub use guide::*;
pub use image::*;
pub use text::*;
