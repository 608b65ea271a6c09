use std::collections::BTreeMap;

use crate::shader::{IoType, ShaderProgram};

use super::error::PipelineError;
use super::mesh::VertexLayout;

/// Rasterization mode for triangles.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PolygonMode {
    #[default]
    Fill,
    /// Wireframe. Needs `Features::POLYGON_MODE_LINE`; falls back to `Fill`
    /// when the device lacks it.
    Line,
}

/// Render pipeline built from a linked program and a vertex layout.
pub struct Pipeline {
    raw: wgpu::RenderPipeline,
}

impl Pipeline {
    /// Builds a triangle-list pipeline drawing into `format`.
    ///
    /// The bind group layout is derived from the uniforms the program uses.
    /// Validation errors raised by the device while building the modules or
    /// the pipeline are returned instead of reaching the uncaptured handler.
    pub fn new(
        device: &wgpu::Device,
        program: &ShaderProgram,
        layout: &VertexLayout,
        format: wgpu::TextureFormat,
        polygon_mode: PolygonMode,
    ) -> Result<Self, PipelineError> {
        check_vertex_inputs(program.vertex_inputs(), layout)?;
        check_color_output(program.fragment_outputs())?;

        let polygon_mode = resolve_polygon_mode(polygon_mode, device.features());

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let (vs_module, fs_module) = program.create_modules(device);

        let attributes = layout.wgpu_attributes();
        let buffers = [wgpu::VertexBufferLayout {
            array_stride: layout.stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        }];

        let raw = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("prism pipeline"),
            layout: None,

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(program.vertex_entry_point()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(program.fragment_entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: match polygon_mode {
                    PolygonMode::Fill => wgpu::PolygonMode::Fill,
                    PolygonMode::Line => wgpu::PolygonMode::Line,
                },
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            log::error!("pipeline rejected by device: {err}");
            return Err(PipelineError::Validation(err.to_string()));
        }

        log::info!("created pipeline ({format:?}, {polygon_mode:?})");

        Ok(Self { raw })
    }

    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.raw
    }
}

/// Every vertex input must be fed by a layout attribute of matching width.
pub fn check_vertex_inputs(
    inputs: &BTreeMap<u32, IoType>,
    layout: &VertexLayout,
) -> Result<(), PipelineError> {
    for (&location, &expected) in inputs {
        match layout.components_at(location) {
            None => return Err(PipelineError::MissingAttribute { location, expected }),
            Some(components) if !expected.is_f32() || components != expected.components => {
                return Err(PipelineError::AttributeMismatch {
                    location,
                    expected,
                    components,
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// The single color target is a float format, so location 0 must be written
/// with `f32` components.
pub fn check_color_output(outputs: &BTreeMap<u32, IoType>) -> Result<(), PipelineError> {
    match outputs.get(&0) {
        None => Err(PipelineError::MissingColorOutput),
        Some(&found) if !found.is_f32() => Err(PipelineError::ColorOutputMismatch { found }),
        Some(_) => Ok(()),
    }
}

pub fn resolve_polygon_mode(requested: PolygonMode, features: wgpu::Features) -> PolygonMode {
    if requested == PolygonMode::Line && !features.contains(wgpu::Features::POLYGON_MODE_LINE) {
        log::warn!("wireframe needs POLYGON_MODE_LINE, which the device lacks; using fill");
        return PolygonMode::Fill;
    }
    requested
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(entries: &[(u32, u32)]) -> BTreeMap<u32, IoType> {
        entries
            .iter()
            .map(|&(loc, n)| (loc, IoType::float(n)))
            .collect()
    }

    #[test]
    fn layout_covers_inputs() {
        let layout = VertexLayout::new().with(0, 3).with(1, 3);
        assert_eq!(check_vertex_inputs(&inputs(&[(0, 3), (1, 3)]), &layout), Ok(()));
        // Extra layout attributes are ignored by the shader.
        assert_eq!(check_vertex_inputs(&inputs(&[(0, 3)]), &layout), Ok(()));
    }

    #[test]
    fn missing_attribute() {
        let layout = VertexLayout::new().with(0, 3);
        assert_eq!(
            check_vertex_inputs(&inputs(&[(0, 3), (1, 3)]), &layout),
            Err(PipelineError::MissingAttribute {
                location: 1,
                expected: IoType::float(3)
            })
        );
    }

    #[test]
    fn width_mismatch() {
        let layout = VertexLayout::new().with(0, 2);
        assert_eq!(
            check_vertex_inputs(&inputs(&[(0, 3)]), &layout),
            Err(PipelineError::AttributeMismatch {
                location: 0,
                expected: IoType::float(3),
                components: 2
            })
        );
    }

    #[test]
    fn integer_input_rejected() {
        let layout = VertexLayout::new().with(0, 1);
        let mut map = BTreeMap::new();
        map.insert(
            0,
            IoType {
                scalar: naga::Scalar::U32,
                ..IoType::float(1)
            },
        );
        assert!(check_vertex_inputs(&map, &layout).is_err());
    }

    #[test]
    fn color_output_must_be_float() {
        assert_eq!(check_color_output(&inputs(&[(0, 4)])), Ok(()));

        let uint = IoType {
            scalar: naga::Scalar::U32,
            ..IoType::float(4)
        };
        assert_eq!(
            check_color_output(&BTreeMap::from([(0, uint)])),
            Err(PipelineError::ColorOutputMismatch { found: uint })
        );
    }

    #[test]
    fn color_output_required() {
        assert_eq!(
            check_color_output(&inputs(&[(1, 4)])),
            Err(PipelineError::MissingColorOutput)
        );
    }

    #[test]
    fn wireframe_fallback() {
        assert_eq!(
            resolve_polygon_mode(PolygonMode::Line, wgpu::Features::empty()),
            PolygonMode::Fill
        );
        assert_eq!(
            resolve_polygon_mode(PolygonMode::Line, wgpu::Features::POLYGON_MODE_LINE),
            PolygonMode::Line
        );
        assert_eq!(
            resolve_polygon_mode(PolygonMode::Fill, wgpu::Features::empty()),
            PolygonMode::Fill
        );
    }
}
