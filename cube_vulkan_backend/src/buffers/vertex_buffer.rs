use crate::{buffers::buffer::Buffer, util::result::Result};
use ash::vk;
use cube_common::mesh::CubeVertex;
use memoffset::offset_of;
use std::convert::TryFrom;
//////////////////////// Structs ///////////////////////
pub struct VertexBuffer {
    pub data: Buffer,
    pub vertex_count: u32,
}
//////////////////////// Impls ///////////////////////
impl VertexBuffer {
    pub fn new(
        vertices: &[CubeVertex],
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        command_pool: vk::CommandPool,
        graphics_queue: vk::Queue,
    ) -> Result<Self> {
        let data = Buffer::create_and_fill(
            instance,
            physical_device,
            logical_device,
            command_pool,
            graphics_queue,
            vertices,
            vk::BufferUsageFlags::VERTEX_BUFFER,
        )?;

        Ok(Self {
            data,
            vertex_count: u32::try_from(vertices.len())?,
        })
    }

    pub unsafe fn cleanup(self, logical_device: &ash::Device) {
        self.data.cleanup(logical_device);
    }

    pub fn get_binding_description() -> vk::VertexInputBindingDescription {
        vk::VertexInputBindingDescription {
            binding: 0,
            stride: std::mem::size_of::<CubeVertex>() as u32,
            input_rate: vk::VertexInputRate::VERTEX,
        }
    }

    /// location 0 is the position, location 1 the texture coordinate
    pub fn get_attribute_descriptions() -> [vk::VertexInputAttributeDescription; 2] {
        [
            vk::VertexInputAttributeDescription {
                binding: 0,
                location: 0,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: offset_of!(CubeVertex, pos) as u32,
            },
            vk::VertexInputAttributeDescription {
                binding: 0,
                location: 1,
                format: vk::Format::R32G32_SFLOAT,
                offset: offset_of!(CubeVertex, tex_coord) as u32,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_input_matches_cube_vertex_layout() {
        let binding = VertexBuffer::get_binding_description();
        assert_eq!(binding.stride, 20);

        let attributes = VertexBuffer::get_attribute_descriptions();
        assert_eq!(attributes[0].offset, 0);
        assert_eq!(attributes[0].format, vk::Format::R32G32B32_SFLOAT);
        assert_eq!(attributes[1].offset, 12);
        assert_eq!(attributes[1].format, vk::Format::R32G32_SFLOAT);
        assert_eq!(attributes[1].location, 1);
    }
}
