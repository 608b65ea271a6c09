use std::collections::BTreeMap;

use bytemuck::Pod;

use crate::shader::UniformSlot;

use super::error::UniformError;
use super::pipeline::Pipeline;

/// GPU buffers and bind groups backing a program's uniforms.
///
/// One buffer per uniform, one bind group per `@group` index up to the
/// highest one used. Unused lower groups get an empty bind group.
pub struct UniformSet {
    slots: Vec<UniformSlot>,
    buffers: Vec<wgpu::Buffer>,
    bind_groups: Vec<(u32, wgpu::BindGroup)>,
}

impl UniformSet {
    pub fn new(device: &wgpu::Device, pipeline: &Pipeline, slots: &[UniformSlot]) -> Self {
        let buffers: Vec<wgpu::Buffer> = slots
            .iter()
            .map(|slot| {
                device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&slot.name),
                    size: slot.size.max(4).next_multiple_of(16),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            })
            .collect();

        let bind_groups = group_members(slots)
            .into_iter()
            .map(|(group, members)| {
                let layout = pipeline.raw().get_bind_group_layout(group);
                let entries: Vec<wgpu::BindGroupEntry<'_>> = members
                    .iter()
                    .map(|&i| wgpu::BindGroupEntry {
                        binding: slots[i].binding,
                        resource: buffers[i].as_entire_binding(),
                    })
                    .collect();

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("prism uniform bind group"),
                    layout: &layout,
                    entries: &entries,
                });
                (group, bind_group)
            })
            .collect();

        Self {
            slots: slots.to_vec(),
            buffers,
            bind_groups,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Writes `value` into the uniform called `name`.
    pub fn write<T: Pod>(
        &self,
        queue: &wgpu::Queue,
        name: &str,
        value: &T,
    ) -> Result<(), UniformError> {
        let bytes = bytemuck::bytes_of(value);
        let index = find_slot(&self.slots, name, bytes.len() as u64)?;
        queue.write_buffer(&self.buffers[index], 0, bytes);
        Ok(())
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        for (group, bind_group) in &self.bind_groups {
            pass.set_bind_group(*group, bind_group, &[]);
        }
    }
}

/// Per-frame handle for updating uniforms.
pub struct UniformWriter<'a> {
    set: &'a UniformSet,
    queue: &'a wgpu::Queue,
}

impl<'a> UniformWriter<'a> {
    pub fn new(set: &'a UniformSet, queue: &'a wgpu::Queue) -> Self {
        Self { set, queue }
    }

    pub fn set<T: Pod>(&mut self, name: &str, value: &T) -> Result<(), UniformError> {
        self.set.write(self.queue, name, value)
    }

    pub fn set_f32(&mut self, name: &str, value: f32) -> Result<(), UniformError> {
        self.set(name, &value)
    }

    pub fn set_vec4(&mut self, name: &str, value: [f32; 4]) -> Result<(), UniformError> {
        self.set(name, &value)
    }
}

/// Slot indices for every group from 0 to the highest used group.
fn group_members(slots: &[UniformSlot]) -> Vec<(u32, Vec<usize>)> {
    let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, slot) in slots.iter().enumerate() {
        groups.entry(slot.group).or_default().push(i);
    }

    let Some(&last) = groups.keys().next_back() else {
        return Vec::new();
    };
    (0..=last)
        .map(|group| (group, groups.remove(&group).unwrap_or_default()))
        .collect()
}

pub(crate) fn find_slot(
    slots: &[UniformSlot],
    name: &str,
    size: u64,
) -> Result<usize, UniformError> {
    let index = slots
        .iter()
        .position(|s| s.name == name)
        .ok_or_else(|| UniformError::Unknown(name.to_string()))?;

    let expected = slots[index].size;
    if expected != size {
        return Err(UniformError::SizeMismatch {
            name: name.to_string(),
            expected,
            actual: size,
        });
    }
    Ok(index)
}
