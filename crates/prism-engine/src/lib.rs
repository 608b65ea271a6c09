//! Prism engine crate.
//!
//! Owns the platform + GPU runtime pieces and the shader-build pipeline used
//! by the tutorial programs.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod paint;
pub mod render;
pub mod shader;
pub mod tutorial;
