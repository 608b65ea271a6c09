use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::error::CompileError;
use super::reflect::{StageInterface, reflect_entry_point};
use super::source::ShaderSource;

/// Pipeline stage a shader entry point runs in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    fn matches(self, stage: naga::ShaderStage) -> bool {
        matches!(
            (self, stage),
            (StageKind::Vertex, naga::ShaderStage::Vertex)
                | (StageKind::Fragment, naga::ShaderStage::Fragment)
        )
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// One compiled and validated shader stage.
///
/// A stage is consumed by [`link`](super::link); it cannot be linked twice or
/// used after linking.
#[derive(Debug)]
pub struct ShaderStage {
    kind: StageKind,
    label: String,
    source: String,
    entry_point: String,
    interface: StageInterface,
}

impl ShaderStage {
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn interface(&self) -> &StageInterface {
        &self.interface
    }

    pub(crate) fn into_parts(self) -> (StageKind, StageCode, StageInterface) {
        let code = StageCode {
            label: self.label,
            source: self.source,
            entry_point: self.entry_point,
        };
        (self.kind, code, self.interface)
    }
}

/// Source text and entry point retained by a linked program for module creation.
#[derive(Debug, Clone)]
pub(crate) struct StageCode {
    pub label: String,
    pub source: String,
    pub entry_point: String,
}

/// Compiles one stage of `kind` from `source`.
///
/// On failure the diagnostic is written to the error log before returning.
/// There is no retry; callers are expected to abort.
pub fn compile(source: &ShaderSource, kind: StageKind) -> Result<ShaderStage, CompileError> {
    let result = compile_stage(source, kind);
    if let Err(err) = &result {
        log::error!("{} ({kind} stage):\n{}", source.label(), err.diagnostic());
    }
    result
}

fn compile_stage(source: &ShaderSource, kind: StageKind) -> Result<ShaderStage, CompileError> {
    let label = source.label().to_string();

    let module = naga::front::wgsl::parse_str(source.text()).map_err(|e| CompileError::Parse {
        label: label.clone(),
        diagnostic: e.emit_to_string(source.text()),
    })?;

    let info = Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| CompileError::Validation {
            label: label.clone(),
            diagnostic: e.emit_to_string(source.text()),
        })?;

    let entry_index = select_entry_point(&module, source.entry_point(), kind, &label)?;
    let interface = reflect_entry_point(&module, &info, entry_index);
    let entry_point = module.entry_points[entry_index].name.clone();

    log::debug!(
        "compiled {kind} stage `{label}` (entry `{entry_point}`, {} inputs, {} outputs)",
        interface.inputs.len(),
        interface.outputs.len()
    );

    Ok(ShaderStage {
        kind,
        label,
        source: source.text().to_string(),
        entry_point,
        interface,
    })
}

fn select_entry_point(
    module: &naga::Module,
    name: Option<&str>,
    kind: StageKind,
    label: &str,
) -> Result<usize, CompileError> {
    let missing = || CompileError::MissingEntryPoint {
        label: label.to_string(),
        kind,
        name: name.map(str::to_string),
    };

    if let Some(name) = name {
        return module
            .entry_points
            .iter()
            .position(|ep| ep.name == name && kind.matches(ep.stage))
            .ok_or_else(missing);
    }

    let candidates: Vec<usize> = module
        .entry_points
        .iter()
        .enumerate()
        .filter(|(_, ep)| kind.matches(ep.stage))
        .map(|(i, _)| i)
        .collect();

    match candidates.as_slice() {
        [] => Err(missing()),
        [only] => Ok(*only),
        many => Err(CompileError::AmbiguousEntryPoint {
            label: label.to_string(),
            kind,
            candidates: many
                .iter()
                .map(|&i| module.entry_points[i].name.clone())
                .collect(),
        }),
    }
}
