//! Entry point interface reflection over validated naga modules.

use std::collections::BTreeMap;
use std::fmt;

use naga::{
    AddressSpace, Binding, Handle, Interpolation, Module, Sampling, ScalarKind, Type, TypeInner,
};

/// Type of a single user-defined input or output (scalar or vector).
///
/// Values passed between stages also carry their interpolation qualifiers,
/// which must agree on both sides. Vertex attributes and color outputs have
/// none.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IoType {
    pub scalar: naga::Scalar,
    pub components: u32,
    pub interpolation: Option<Interpolation>,
    pub sampling: Option<Sampling>,
}

impl IoType {
    pub const fn float(components: u32) -> Self {
        Self {
            scalar: naga::Scalar::F32,
            components,
            interpolation: None,
            sampling: None,
        }
    }

    /// Same type with the given qualifiers.
    pub const fn interpolated(
        self,
        interpolation: Interpolation,
        sampling: Option<Sampling>,
    ) -> Self {
        Self {
            interpolation: Some(interpolation),
            sampling,
            ..self
        }
    }

    pub fn is_f32(&self) -> bool {
        self.scalar == naga::Scalar::F32
    }

    fn from_inner(inner: &TypeInner) -> Option<Self> {
        let (scalar, components) = match *inner {
            TypeInner::Scalar(scalar) => (scalar, 1),
            TypeInner::Vector { size, scalar } => (scalar, size as u32),
            _ => return None,
        };
        Some(Self {
            scalar,
            components,
            interpolation: None,
            sampling: None,
        })
    }
}

impl fmt::Display for IoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.scalar.kind {
            ScalarKind::Float | ScalarKind::AbstractFloat => "f",
            ScalarKind::Sint | ScalarKind::AbstractInt => "i",
            ScalarKind::Uint => "u",
            ScalarKind::Bool => "bool",
        };
        let scalar = if self.scalar.kind == ScalarKind::Bool {
            kind.to_string()
        } else {
            format!("{kind}{}", u32::from(self.scalar.width) * 8)
        };

        if self.components == 1 {
            write!(f, "{scalar}")?;
        } else {
            write!(f, "vec{}<{scalar}>", self.components)?;
        }

        if let Some(interpolation) = self.interpolation {
            let interpolation = match interpolation {
                Interpolation::Perspective => "perspective",
                Interpolation::Linear => "linear",
                Interpolation::Flat => "flat",
            };
            match self.sampling {
                Some(sampling) => {
                    let sampling = match sampling {
                        Sampling::Center => "center",
                        Sampling::Centroid => "centroid",
                        Sampling::Sample => "sample",
                        Sampling::First => "first",
                        Sampling::Either => "either",
                    };
                    write!(f, " @interpolate({interpolation}, {sampling})")?;
                }
                None => write!(f, " @interpolate({interpolation})")?,
            }
        }
        Ok(())
    }
}

/// A uniform buffer binding used by an entry point.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformSlot {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    /// Size of the bound type in bytes.
    pub size: u64,
}

/// A bound resource other than a uniform buffer (storage buffer, texture,
/// sampler). Programs cannot feed these.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResourceSlot {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub kind: &'static str,
}

/// User-visible interface of one entry point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageInterface {
    /// Inputs keyed by `@location`.
    pub inputs: BTreeMap<u32, IoType>,
    /// Outputs keyed by `@location`.
    pub outputs: BTreeMap<u32, IoType>,
    /// Uniform buffers the entry point actually touches.
    pub uniforms: Vec<UniformSlot>,
    /// Other bound resources the entry point touches.
    pub resources: Vec<ResourceSlot>,
}

pub(crate) fn reflect_entry_point(
    module: &Module,
    info: &naga::valid::ModuleInfo,
    entry_index: usize,
) -> StageInterface {
    let entry = &module.entry_points[entry_index];
    let mut interface = StageInterface::default();

    // Only values between the two stages are interpolated.
    let varying_inputs = entry.stage == naga::ShaderStage::Fragment;
    let varying_outputs = entry.stage == naga::ShaderStage::Vertex;

    for arg in &entry.function.arguments {
        let binding = arg.binding.as_ref();
        collect_locations(module, binding, arg.ty, varying_inputs, &mut interface.inputs);
    }
    if let Some(result) = &entry.function.result {
        let binding = result.binding.as_ref();
        collect_locations(module, binding, result.ty, varying_outputs, &mut interface.outputs);
    }

    let usage = info.get_entry_point(entry_index);
    for (handle, global) in module.global_variables.iter() {
        if usage[handle].is_empty() {
            continue;
        }
        let Some(binding) = &global.binding else { continue };
        let name = global
            .name
            .clone()
            .unwrap_or_else(|| format!("binding_{}_{}", binding.group, binding.binding));

        let kind = match global.space {
            AddressSpace::Uniform => {
                interface.uniforms.push(UniformSlot {
                    name,
                    group: binding.group,
                    binding: binding.binding,
                    size: u64::from(module.types[global.ty].inner.size(module.to_ctx())),
                });
                continue;
            }
            AddressSpace::Storage { .. } => "storage buffer",
            AddressSpace::Handle => "texture or sampler",
            _ => "resource",
        };
        interface.resources.push(ResourceSlot {
            name,
            group: binding.group,
            binding: binding.binding,
            kind,
        });
    }

    interface
}

// Struct arguments and results carry their bindings on the members.
fn collect_locations(
    module: &Module,
    binding: Option<&Binding>,
    ty: Handle<Type>,
    varying: bool,
    out: &mut BTreeMap<u32, IoType>,
) {
    match binding {
        Some(Binding::Location {
            location,
            interpolation,
            sampling,
            ..
        }) => {
            let Some(mut io) = IoType::from_inner(&module.types[ty].inner) else {
                return;
            };
            if varying {
                io.interpolation = *interpolation;
                io.sampling = *sampling;
            }
            out.insert(*location, io);
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.binding.as_ref(), member.ty, varying, out);
                }
            }
        }
    }
}
