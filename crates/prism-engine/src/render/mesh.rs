use std::collections::HashSet;

use wgpu::util::DeviceExt;

use super::error::MeshError;

/// One `f32` attribute of a vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    /// Shader `@location`.
    pub location: u32,
    /// Number of `f32` components (1 to 4).
    pub components: u32,
}

/// Interleaved attribute layout.
///
/// Attributes are packed tightly in declaration order: each offset is the sum
/// of the preceding component counts and the stride is the total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute of `components` floats read at `location`.
    pub fn with(mut self, location: u32, components: u32) -> Self {
        self.attributes.push(VertexAttribute {
            location,
            components,
        });
        self
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn floats_per_vertex(&self) -> usize {
        self.attributes.iter().map(|a| a.components as usize).sum()
    }

    /// Byte distance between consecutive vertices.
    pub fn stride(&self) -> u64 {
        (self.floats_per_vertex() * std::mem::size_of::<f32>()) as u64
    }

    /// Components provided at `location`, if any.
    pub fn components_at(&self, location: u32) -> Option<u32> {
        self.attributes
            .iter()
            .find(|a| a.location == location)
            .map(|a| a.components)
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.attributes.is_empty() {
            return Err(MeshError::EmptyLayout);
        }

        let mut seen = HashSet::new();
        for a in &self.attributes {
            if !(1..=4).contains(&a.components) {
                return Err(MeshError::BadComponentCount {
                    location: a.location,
                    components: a.components,
                });
            }
            if !seen.insert(a.location) {
                return Err(MeshError::DuplicateLocation(a.location));
            }
        }
        Ok(())
    }

    /// wgpu attribute descriptors with derived offsets.
    ///
    /// Assumes the layout passed [`validate`](Self::validate).
    pub fn wgpu_attributes(&self) -> Vec<wgpu::VertexAttribute> {
        let mut offset = 0u64;
        self.attributes
            .iter()
            .map(|a| {
                let format = match a.components {
                    1 => wgpu::VertexFormat::Float32,
                    2 => wgpu::VertexFormat::Float32x2,
                    3 => wgpu::VertexFormat::Float32x3,
                    _ => wgpu::VertexFormat::Float32x4,
                };
                let attr = wgpu::VertexAttribute {
                    format,
                    offset,
                    shader_location: a.location,
                };
                offset += u64::from(a.components) * std::mem::size_of::<f32>() as u64;
                attr
            })
            .collect()
    }
}

/// CPU-side geometry: interleaved vertex floats and optional indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<f32>,
    indices: Option<Vec<u32>>,
    layout: VertexLayout,
}

impl Mesh {
    pub fn new(
        vertices: Vec<f32>,
        indices: Option<Vec<u32>>,
        layout: VertexLayout,
    ) -> Result<Self, MeshError> {
        layout.validate()?;

        if vertices.is_empty() {
            return Err(MeshError::NoVertices);
        }

        let floats_per_vertex = layout.floats_per_vertex();
        if vertices.len() % floats_per_vertex != 0 {
            return Err(MeshError::RaggedVertices {
                floats: vertices.len(),
                floats_per_vertex,
            });
        }

        let vertex_count = vertices.len() / floats_per_vertex;
        if let Some(&index) = indices
            .iter()
            .flatten()
            .find(|&&i| i as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        Ok(Self {
            vertices,
            indices,
            layout,
        })
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn vertex_count(&self) -> u32 {
        (self.vertices.len() / self.layout.floats_per_vertex()) as u32
    }

    pub fn index_count(&self) -> Option<u32> {
        self.indices.as_ref().map(|i| i.len() as u32)
    }

    /// Uploads the data once into static GPU buffers.
    pub fn upload(&self, device: &wgpu::Device) -> GpuMesh {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prism mesh vbo"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ibo = self.indices.as_ref().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("prism mesh ibo"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        log::debug!(
            "uploaded mesh: {} vertices, {} indices",
            self.vertex_count(),
            self.index_count().unwrap_or(0)
        );

        GpuMesh {
            vbo,
            ibo,
            vertex_count: self.vertex_count(),
            index_count: self.index_count().unwrap_or(0),
        }
    }
}

/// GPU-resident vertex buffer and optional index buffer.
pub struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: Option<wgpu::Buffer>,
    vertex_count: u32,
    index_count: u32,
}

impl GpuMesh {
    /// Binds the buffers and issues one draw call.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vbo.slice(..));
        match &self.ibo {
            Some(ibo) => {
                pass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
            None => pass.draw(0..self.vertex_count, 0..1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos_color() -> VertexLayout {
        VertexLayout::new().with(0, 3).with(1, 3)
    }

    #[test]
    fn offsets_follow_declaration_order() {
        let attrs = pos_color().wgpu_attributes();
        assert_eq!(attrs[0].offset, 0);
        assert_eq!(attrs[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(attrs[1].offset, 12);
        assert_eq!(attrs[1].shader_location, 1);
        assert_eq!(pos_color().stride(), 24);
    }

    #[test]
    fn triangle() {
        let mesh = Mesh::new(
            vec![0.5, -0.5, 0.0, -0.5, -0.5, 0.0, 0.0, 0.5, 0.0],
            None,
            VertexLayout::new().with(0, 3),
        )
        .unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), None);
    }

    #[test]
    fn indexed_rectangle() {
        let mesh = Mesh::new(
            vec![0.5, 0.5, 0.0, 0.5, -0.5, 0.0, -0.5, -0.5, 0.0, -0.5, 0.5, 0.0],
            Some(vec![0, 1, 3, 1, 2, 3]),
            VertexLayout::new().with(0, 3),
        )
        .unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), Some(6));
    }

    #[test]
    fn ragged_vertices() {
        let err = Mesh::new(vec![0.0; 10], None, pos_color()).unwrap_err();
        assert_eq!(
            err,
            MeshError::RaggedVertices {
                floats: 10,
                floats_per_vertex: 6
            }
        );
    }

    #[test]
    fn index_past_end() {
        let err = Mesh::new(vec![0.0; 9], Some(vec![0, 1, 3]), VertexLayout::new().with(0, 3))
            .unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn bad_layouts() {
        assert_eq!(VertexLayout::new().validate(), Err(MeshError::EmptyLayout));
        assert_eq!(
            VertexLayout::new().with(0, 5).validate(),
            Err(MeshError::BadComponentCount {
                location: 0,
                components: 5
            })
        );
        assert_eq!(
            VertexLayout::new().with(2, 3).with(2, 2).validate(),
            Err(MeshError::DuplicateLocation(2))
        );
    }

    #[test]
    fn empty_vertices() {
        let err = Mesh::new(Vec::new(), None, VertexLayout::new().with(0, 3)).unwrap_err();
        assert_eq!(err, MeshError::NoVertices);
    }
}
