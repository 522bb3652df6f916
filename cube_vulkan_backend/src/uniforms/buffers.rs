use crate::buffers::buffer::Buffer;
use crate::buffers::memory::{self, MemoryCopyable};
use crate::presentation::swap_chain::SwapChainContainer;
use crate::util::result::{Result, VulkanError};

use ash::vk;
use cube_common::uniforms::{copy_uniform_to_memory, UniformBufferObject};
use std::convert::TryFrom;
//////////////////////// Structs ///////////////////////
/// One host visible uniform buffer per swap chain image, so a frame never writes a buffer
/// that an image still in flight is reading.
pub struct UniformBuffers {
    pub buffers: Vec<Buffer>,
}
//////////////////////// Impls ///////////////////////
impl MemoryCopyable for UniformBufferObject {
    fn byte_size(&self) -> usize {
        std::mem::size_of::<UniformBufferObject>()
    }

    unsafe fn copy_to_mapped_memory(&self, data_target_ptr: *mut std::ffi::c_void) {
        copy_uniform_to_memory(self, data_target_ptr);
    }
}

impl UniformBuffers {
    pub fn new(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        swap_chain_container: &SwapChainContainer,
    ) -> Result<Self> {
        let size = Self::buffer_size()?;

        let mut buffers = Vec::with_capacity(swap_chain_container.swap_chain_images.len());
        for _ in 0..swap_chain_container.swap_chain_images.len() {
            let created = Buffer::new(
                instance,
                physical_device,
                logical_device,
                size,
                vk::BufferUsageFlags::UNIFORM_BUFFER,
                vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
            );
            match created {
                Ok(buffer) => buffers.push(buffer),
                Err(error) => {
                    let mut partial = Self { buffers };
                    unsafe { partial.cleanup(logical_device) };
                    return Err(error);
                }
            }
        }

        Ok(Self { buffers })
    }

    pub fn buffer_size() -> Result<vk::DeviceSize> {
        Ok(vk::DeviceSize::try_from(std::mem::size_of::<
            UniformBufferObject,
        >())?)
    }

    pub fn update(
        &self,
        logical_device: &ash::Device,
        image_index: usize,
        ubo: &UniformBufferObject,
    ) -> Result<()> {
        let buffer = self
            .buffers
            .get(image_index)
            .ok_or(VulkanError::UniformBufferNotAvailable(image_index))?;
        unsafe { memory::fill_buffer(logical_device, buffer.memory, ubo) }
    }

    pub unsafe fn cleanup(&mut self, logical_device: &ash::Device) {
        for buffer in self.buffers.drain(..) {
            buffer.cleanup(logical_device);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_holds_exactly_one_block() {
        assert_eq!(UniformBuffers::buffer_size().unwrap(), 192);
        let ubo = UniformBufferObject {
            model: glm::Mat4::identity(),
            view: glm::Mat4::identity(),
            proj: glm::Mat4::identity(),
        };
        assert_eq!(ubo.byte_size(), 192);
    }

    #[test]
    fn copies_the_block_into_mapped_memory() {
        let ubo = UniformBufferObject {
            model: glm::Mat4::identity() * 2.0,
            view: glm::Mat4::identity(),
            proj: glm::Mat4::identity() * 3.0,
        };
        let mut target = vec![0f32; 48];
        unsafe {
            ubo.copy_to_mapped_memory(target.as_mut_ptr() as *mut std::ffi::c_void);
        }
        assert_eq!(target[0], 2.0);
        assert_eq!(target[16], 1.0);
        assert_eq!(target[32], 3.0);
        assert_eq!(target[33], 0.0);
    }
}
