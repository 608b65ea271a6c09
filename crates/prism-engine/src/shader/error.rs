use std::fmt;
use std::path::PathBuf;

use super::reflect::IoType;
use super::stage::StageKind;

/// Failure to turn shader source into a usable stage.
#[derive(Debug)]
pub enum CompileError {
    /// The source file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// WGSL front end rejected the text.
    Parse { label: String, diagnostic: String },
    /// The module parsed but failed validation.
    Validation { label: String, diagnostic: String },
    /// No entry point of the requested kind (or with the requested name).
    MissingEntryPoint {
        label: String,
        kind: StageKind,
        name: Option<String>,
    },
    /// Several entry points of the requested kind and none was named.
    AmbiguousEntryPoint {
        label: String,
        kind: StageKind,
        candidates: Vec<String>,
    },
}

impl CompileError {
    /// Compiler log text for this failure.
    pub fn diagnostic(&self) -> String {
        match self {
            CompileError::Parse { diagnostic, .. }
            | CompileError::Validation { diagnostic, .. } => diagnostic.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Io { path, source } => {
                write!(f, "failed to read shader {}: {source}", path.display())
            }
            CompileError::Parse { label, diagnostic } => {
                write!(f, "{label}: parse error\n{diagnostic}")
            }
            CompileError::Validation { label, diagnostic } => {
                write!(f, "{label}: validation error\n{diagnostic}")
            }
            CompileError::MissingEntryPoint {
                label,
                kind,
                name: Some(name),
            } => write!(f, "{label}: no {kind} entry point named `{name}`"),
            CompileError::MissingEntryPoint {
                label,
                kind,
                name: None,
            } => write!(f, "{label}: no {kind} entry point"),
            CompileError::AmbiguousEntryPoint {
                label,
                kind,
                candidates,
            } => write!(
                f,
                "{label}: several {kind} entry points ({}); name one explicitly",
                candidates.join(", ")
            ),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure to combine compiled stages into a program.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkError {
    MissingStage(StageKind),
    DuplicateStage(StageKind),
    /// The fragment stage reads a location the vertex stage never writes.
    MissingVaryingOutput { location: u32, expected: IoType },
    /// Both stages use the location, with different types or interpolation.
    InterfaceMismatch {
        location: u32,
        vertex: IoType,
        fragment: IoType,
    },
    /// The stages bind different uniforms to the same slot.
    UniformConflict {
        group: u32,
        binding: u32,
        vertex: String,
        fragment: String,
    },
    /// A stage uses a bound resource that is not a uniform buffer.
    UnsupportedResource {
        stage: StageKind,
        name: String,
        group: u32,
        binding: u32,
        kind: &'static str,
    },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::MissingStage(kind) => write!(f, "program has no {kind} stage"),
            LinkError::DuplicateStage(kind) => write!(f, "program has more than one {kind} stage"),
            LinkError::MissingVaryingOutput { location, expected } => write!(
                f,
                "fragment input at location {location} ({expected}) is not written by the \
                 vertex stage"
            ),
            LinkError::InterfaceMismatch {
                location,
                vertex,
                fragment,
            } => write!(
                f,
                "location {location}: vertex stage writes {vertex} \
                 but fragment stage reads {fragment}"
            ),
            LinkError::UniformConflict {
                group,
                binding,
                vertex,
                fragment,
            } => write!(
                f,
                "uniform slot @group({group}) @binding({binding}) is `{vertex}` in the vertex \
                 stage but `{fragment}` in the fragment stage"
            ),
            LinkError::UnsupportedResource {
                stage,
                name,
                group,
                binding,
                kind,
            } => write!(
                f,
                "{stage} stage uses {kind} `{name}` at @group({group}) @binding({binding}); \
                 only uniform buffers can be bound"
            ),
        }
    }
}

impl std::error::Error for LinkError {}
