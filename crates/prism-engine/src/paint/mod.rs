//! Color values shared by the render paths.

mod color;

pub use color::Color;
