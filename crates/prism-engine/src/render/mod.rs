//! GPU rendering subsystem.
//!
//! Static geometry is uploaded once and drawn every frame with a pipeline
//! built from a linked [`ShaderProgram`](crate::shader::ShaderProgram).
//!
//! Convention:
//! - vertex positions are already in NDC; no viewport transform is applied
//! - the viewport always covers the full render target

mod ctx;
mod error;
mod mesh;
mod pipeline;
mod uniforms;

pub use ctx::RenderCtx;
pub use error::{MeshError, PipelineError, UniformError};
pub use mesh::{GpuMesh, Mesh, VertexAttribute, VertexLayout};
pub use pipeline::{
    Pipeline, PolygonMode, check_color_output, check_vertex_inputs, resolve_polygon_mode,
};
pub use uniforms::{UniformSet, UniformWriter};
