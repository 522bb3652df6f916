use crate::presentation::swap_chain::SwapChainContainer;
use crate::textures::images::TextureImage;
use crate::uniforms::buffers::UniformBuffers;
use crate::util::result::{Result, VulkanError};

use ash::version::DeviceV1_0;
use ash::vk;
use std::convert::TryFrom;
//////////////////////// Consts ///////////////////////
pub const UBO_BINDING: u32 = 0;
pub const SAMPLER_BINDING: u32 = 1;
//////////////////////// Structs ///////////////////////
#[derive(Debug)]
pub struct DescriptorData {
    pub descriptor_pool: vk::DescriptorPool,
    pub descriptor_sets: Vec<vk::DescriptorSet>,
}
//////////////////////// Impls ///////////////////////
impl DescriptorData {
    pub fn new(
        logical_device: &ash::Device,
        swap_chain_container: &SwapChainContainer,
        descriptor_layout: vk::DescriptorSetLayout,
        uniform_buffers: &UniformBuffers,
        texture_image: &TextureImage,
    ) -> Result<Self> {
        let image_count = swap_chain_container.swap_chain_images.len();
        let descriptor_pool = Self::create_descriptor_pool(logical_device, image_count)?;

        match Self::create_descriptor_sets(
            logical_device,
            image_count,
            descriptor_pool,
            descriptor_layout,
            uniform_buffers,
            texture_image,
        ) {
            Ok(descriptor_sets) => Ok(Self {
                descriptor_pool,
                descriptor_sets,
            }),
            Err(error) => {
                unsafe { logical_device.destroy_descriptor_pool(descriptor_pool, None) };
                Err(error)
            }
        }
    }

    fn create_descriptor_pool(
        logical_device: &ash::Device,
        image_count: usize,
    ) -> Result<vk::DescriptorPool> {
        let swap_chain_img_cnt = u32::try_from(image_count)?;

        let descriptor_pool_sizes = [
            vk::DescriptorPoolSize {
                ty: vk::DescriptorType::UNIFORM_BUFFER,
                descriptor_count: swap_chain_img_cnt,
            },
            vk::DescriptorPoolSize {
                ty: vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
                descriptor_count: swap_chain_img_cnt,
            },
        ];

        let create_info = vk::DescriptorPoolCreateInfo::builder()
            .pool_sizes(&descriptor_pool_sizes)
            .max_sets(swap_chain_img_cnt);

        let descriptor_pool = unsafe { logical_device.create_descriptor_pool(&create_info, None)? };

        Ok(descriptor_pool)
    }

    fn create_descriptor_sets(
        logical_device: &ash::Device,
        image_count: usize,
        descriptor_pool: vk::DescriptorPool,
        descriptor_layout: vk::DescriptorSetLayout,
        uniform_buffers: &UniformBuffers,
        texture_image: &TextureImage,
    ) -> Result<Vec<vk::DescriptorSet>> {
        if uniform_buffers.buffers.len() < image_count {
            return Err(VulkanError::UniformBufferNotAvailable(
                uniform_buffers.buffers.len(),
            ));
        }

        let layouts = vec![descriptor_layout; image_count];
        let descriptor_alloc_info = vk::DescriptorSetAllocateInfo::builder()
            .descriptor_pool(descriptor_pool)
            .set_layouts(&layouts);

        // sets are freed together with the pool
        let descriptor_sets =
            unsafe { logical_device.allocate_descriptor_sets(&descriptor_alloc_info)? };
        let ubo_range = UniformBuffers::buffer_size()?;

        for (buf_idx, uniform_buffer) in uniform_buffers.buffers.iter().take(image_count).enumerate() {
            let descriptor_set = *descriptor_sets
                .get(buf_idx)
                .ok_or(VulkanError::DescriptorSetNotAvailable(buf_idx))?;

            let descriptor_buffer_info = [vk::DescriptorBufferInfo {
                buffer: uniform_buffer.buffer,
                offset: 0,
                range: ubo_range,
            }];

            let descriptor_sampler_info = [vk::DescriptorImageInfo {
                image_layout: vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
                image_view: texture_image.view,
                sampler: texture_image.sampler,
            }];

            let descriptor_write_info = [
                vk::WriteDescriptorSet::builder()
                    .dst_set(descriptor_set)
                    .dst_binding(UBO_BINDING)
                    .dst_array_element(0)
                    .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                    .buffer_info(&descriptor_buffer_info)
                    .build(),
                vk::WriteDescriptorSet::builder()
                    .dst_set(descriptor_set)
                    .dst_binding(SAMPLER_BINDING)
                    .dst_array_element(0)
                    .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                    .image_info(&descriptor_sampler_info)
                    .build(),
            ];

            unsafe {
                logical_device.update_descriptor_sets(&descriptor_write_info, &[]);
            }
        }

        Ok(descriptor_sets)
    }

    pub unsafe fn cleanup(&mut self, logical_device: &ash::Device) {
        logical_device.destroy_descriptor_pool(self.descriptor_pool, None);
        self.descriptor_sets.clear();
    }
}
//////////////////////// Fns ///////////////////////
pub fn descriptor_set_layout_bindings() -> [vk::DescriptorSetLayoutBinding; 2] {
    [
        vk::DescriptorSetLayoutBinding {
            binding: UBO_BINDING,
            descriptor_type: vk::DescriptorType::UNIFORM_BUFFER,
            descriptor_count: 1,
            stage_flags: vk::ShaderStageFlags::VERTEX,
            ..Default::default()
        },
        vk::DescriptorSetLayoutBinding {
            binding: SAMPLER_BINDING,
            descriptor_type: vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
            descriptor_count: 1,
            stage_flags: vk::ShaderStageFlags::FRAGMENT,
            ..Default::default()
        },
    ]
}

pub fn create_descriptor_set_layout(
    logical_device: &ash::Device,
) -> Result<vk::DescriptorSetLayout> {
    let bindings = descriptor_set_layout_bindings();
    let descriptor_layout_info = vk::DescriptorSetLayoutCreateInfo::builder().bindings(&bindings);

    let descriptor_layout =
        unsafe { logical_device.create_descriptor_set_layout(&descriptor_layout_info, None)? };

    Ok(descriptor_layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ubo_in_vertex_stage_and_sampler_in_fragment_stage() {
        let bindings = descriptor_set_layout_bindings();
        assert_eq!(bindings[0].binding, 0);
        assert_eq!(bindings[0].descriptor_type, vk::DescriptorType::UNIFORM_BUFFER);
        assert_eq!(bindings[0].stage_flags, vk::ShaderStageFlags::VERTEX);
        assert_eq!(bindings[1].binding, 1);
        assert_eq!(
            bindings[1].descriptor_type,
            vk::DescriptorType::COMBINED_IMAGE_SAMPLER
        );
        assert_eq!(bindings[1].stage_flags, vk::ShaderStageFlags::FRAGMENT);
    }
}
