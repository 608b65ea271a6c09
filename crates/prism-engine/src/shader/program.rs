use std::collections::BTreeMap;

use super::error::LinkError;
use super::reflect::{IoType, StageInterface, UniformSlot};
use super::stage::{ShaderStage, StageCode, StageKind};

/// A linked vertex + fragment pair and its reflected interface.
///
/// Holds no compiled stage objects; GPU shader modules are created from the
/// retained source when a pipeline is built.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    vertex: StageCode,
    fragment: StageCode,
    vertex_inputs: BTreeMap<u32, IoType>,
    fragment_outputs: BTreeMap<u32, IoType>,
    uniforms: Vec<UniformSlot>,
}

impl ShaderProgram {
    /// Vertex attribute inputs keyed by `@location`.
    pub fn vertex_inputs(&self) -> &BTreeMap<u32, IoType> {
        &self.vertex_inputs
    }

    /// Color outputs of the fragment stage keyed by `@location`.
    pub fn fragment_outputs(&self) -> &BTreeMap<u32, IoType> {
        &self.fragment_outputs
    }

    /// Uniform buffers used by either stage, ordered by group then binding.
    pub fn uniforms(&self) -> &[UniformSlot] {
        &self.uniforms
    }

    pub fn vertex_entry_point(&self) -> &str {
        &self.vertex.entry_point
    }

    pub fn fragment_entry_point(&self) -> &str {
        &self.fragment.entry_point
    }

    /// Creates the GPU shader modules as `(vertex, fragment)`.
    pub fn create_modules(
        &self,
        device: &wgpu::Device,
    ) -> (wgpu::ShaderModule, wgpu::ShaderModule) {
        let create = |code: &StageCode| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&code.label),
                source: wgpu::ShaderSource::Wgsl(code.source.as_str().into()),
            })
        };
        (create(&self.vertex), create(&self.fragment))
    }
}

/// Links compiled stages into a program.
///
/// Every stage is consumed, so all of them are released when this returns,
/// whether or not linking succeeded. Failures are written to the error log.
pub fn link<I>(stages: I) -> Result<ShaderProgram, LinkError>
where
    I: IntoIterator<Item = ShaderStage>,
{
    let result = link_stages(stages);
    if let Err(err) = &result {
        log::error!("link:\n{err}");
    }
    result
}

fn link_stages<I>(stages: I) -> Result<ShaderProgram, LinkError>
where
    I: IntoIterator<Item = ShaderStage>,
{
    let mut vertex: Option<(StageCode, StageInterface)> = None;
    let mut fragment: Option<(StageCode, StageInterface)> = None;
    let mut duplicate = None;

    // Drain everything first so no stage outlives a failed link.
    for stage in stages {
        let (kind, code, interface) = stage.into_parts();
        log::trace!("attached {kind} stage `{}`", code.label);

        let slot = match kind {
            StageKind::Vertex => &mut vertex,
            StageKind::Fragment => &mut fragment,
        };
        if slot.is_some() {
            duplicate.get_or_insert(kind);
        } else {
            *slot = Some((code, interface));
        }
    }

    if let Some(kind) = duplicate {
        return Err(LinkError::DuplicateStage(kind));
    }
    let (vertex, vs) = vertex.ok_or(LinkError::MissingStage(StageKind::Vertex))?;
    let (fragment, fs) = fragment.ok_or(LinkError::MissingStage(StageKind::Fragment))?;

    check_resources(StageKind::Vertex, &vs)?;
    check_resources(StageKind::Fragment, &fs)?;
    check_varyings(&vs, &fs)?;
    let uniforms = merge_uniforms(&vs.uniforms, &fs.uniforms)?;

    log::debug!(
        "linked program `{}` + `{}` ({} vertex inputs, {} uniforms)",
        vertex.label,
        fragment.label,
        vs.inputs.len(),
        uniforms.len()
    );

    Ok(ShaderProgram {
        vertex,
        fragment,
        vertex_inputs: vs.inputs,
        fragment_outputs: fs.outputs,
        uniforms,
    })
}

fn check_varyings(vs: &StageInterface, fs: &StageInterface) -> Result<(), LinkError> {
    for (&location, &fragment) in &fs.inputs {
        match vs.outputs.get(&location) {
            None => {
                return Err(LinkError::MissingVaryingOutput {
                    location,
                    expected: fragment,
                });
            }
            Some(&vertex) if vertex != fragment => {
                return Err(LinkError::InterfaceMismatch {
                    location,
                    vertex,
                    fragment,
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn check_resources(stage: StageKind, interface: &StageInterface) -> Result<(), LinkError> {
    match interface.resources.first() {
        Some(res) => Err(LinkError::UnsupportedResource {
            stage,
            name: res.name.clone(),
            group: res.group,
            binding: res.binding,
            kind: res.kind,
        }),
        None => Ok(()),
    }
}

fn merge_uniforms(
    vs: &[UniformSlot],
    fs: &[UniformSlot],
) -> Result<Vec<UniformSlot>, LinkError> {
    let mut merged: BTreeMap<(u32, u32), UniformSlot> = BTreeMap::new();

    for slot in vs {
        merged.insert((slot.group, slot.binding), slot.clone());
    }

    for slot in fs {
        match merged.get(&(slot.group, slot.binding)) {
            Some(existing) if existing.name != slot.name || existing.size != slot.size => {
                return Err(LinkError::UniformConflict {
                    group: slot.group,
                    binding: slot.binding,
                    vertex: format!("{} ({} bytes)", existing.name, existing.size),
                    fragment: format!("{} ({} bytes)", slot.name, slot.size),
                });
            }
            Some(_) => {}
            None => {
                merged.insert((slot.group, slot.binding), slot.clone());
            }
        }
    }

    Ok(merged.into_values().collect())
}
