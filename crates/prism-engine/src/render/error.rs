use std::fmt;

use crate::shader::IoType;

/// Invalid vertex/index data or attribute layout.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    EmptyLayout,
    /// Attributes are one to four `f32` components.
    BadComponentCount { location: u32, components: u32 },
    DuplicateLocation(u32),
    NoVertices,
    /// Vertex data does not divide into whole vertices.
    RaggedVertices { floats: usize, floats_per_vertex: usize },
    IndexOutOfRange { index: u32, vertex_count: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::EmptyLayout => write!(f, "vertex layout has no attributes"),
            MeshError::BadComponentCount {
                location,
                components,
            } => write!(
                f,
                "attribute at location {location} has {components} components (expected 1 to 4)"
            ),
            MeshError::DuplicateLocation(location) => {
                write!(f, "vertex layout declares location {location} twice")
            }
            MeshError::NoVertices => write!(f, "mesh has no vertices"),
            MeshError::RaggedVertices {
                floats,
                floats_per_vertex,
            } => write!(
                f,
                "{floats} floats do not divide into vertices of {floats_per_vertex} floats"
            ),
            MeshError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(f, "index {index} out of range for {vertex_count} vertices"),
        }
    }
}

impl std::error::Error for MeshError {}

/// The program does not fit the mesh layout or the color target, or the
/// device rejected the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    MissingAttribute { location: u32, expected: IoType },
    AttributeMismatch {
        location: u32,
        expected: IoType,
        components: u32,
    },
    MissingColorOutput,
    ColorOutputMismatch { found: IoType },
    /// Device validation message.
    Validation(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MissingAttribute { location, expected } => write!(
                f,
                "vertex stage reads {expected} at location {location} \
                 but the layout does not provide it"
            ),
            PipelineError::AttributeMismatch {
                location,
                expected,
                components,
            } => write!(
                f,
                "vertex stage reads {expected} at location {location} \
                 but the layout provides {components} x f32"
            ),
            PipelineError::MissingColorOutput => {
                write!(f, "fragment stage does not write a color at location 0")
            }
            PipelineError::ColorOutputMismatch { found } => write!(
                f,
                "fragment stage writes {found} at location 0 but the color target takes f32"
            ),
            PipelineError::Validation(message) => {
                write!(f, "device rejected pipeline: {message}")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// Failure to write a uniform value.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformError {
    Unknown(String),
    SizeMismatch {
        name: String,
        expected: u64,
        actual: u64,
    },
}

impl fmt::Display for UniformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformError::Unknown(name) => write!(f, "program has no uniform named `{name}`"),
            UniformError::SizeMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "uniform `{name}` is {expected} bytes but {actual} bytes were written"
            ),
        }
    }
}

impl std::error::Error for UniformError {}
