//! Shader compilation and program linking.
//!
//! Stages are WGSL, parsed and validated on the CPU with naga before any GPU
//! object exists. Linking checks that the vertex outputs feed the fragment
//! inputs and collects the uniform slots both stages use.

mod error;
mod program;
mod reflect;
mod source;
mod stage;

pub use error::{CompileError, LinkError};
pub use program::{ShaderProgram, link};
pub use reflect::{IoType, StageInterface, UniformSlot};
pub use source::ShaderSource;
pub use stage::{ShaderStage, StageKind, compile};
