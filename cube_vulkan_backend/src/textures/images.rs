use crate::{
    buffers::buffer::Buffer,
    drawing::command_buffers::{begin_single_time_commands, end_single_time_commands},
    util::result::{Result, VulkanError},
};

use ash::{
    version::{DeviceV1_0, InstanceV1_0},
    vk,
};
use cube_common::texture::TextureSource;
use log::{info, warn};
use std::convert::TryFrom;
//////////////////////// Consts ///////////////////////
pub const TEXTURE_FORMAT: vk::Format = vk::Format::R8G8B8A8_SRGB;
//////////////////////// Enums ///////////////////////
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MipmapParam {
    NoMipmap,
    FullChain(u32),
}
//////////////////////// Structs ///////////////////////
pub struct Image {
    pub image: vk::Image,
    pub width: u32,
    pub height: u32,
    pub memory: vk::DeviceMemory,
    pub mip_levels: u32,
}

pub struct TextureImage {
    pub image: Image,
    pub view: vk::ImageView,
    pub sampler: vk::Sampler,
}

struct TransitionMasks {
    src_access_mask: vk::AccessFlags,
    dst_access_mask: vk::AccessFlags,
    src_stage_mask: vk::PipelineStageFlags,
    dst_stage_mask: vk::PipelineStageFlags,
}
//////////////////////// Impls ///////////////////////
impl MipmapParam {
    pub fn level_count(self) -> u32 {
        match self {
            MipmapParam::NoMipmap => 1,
            MipmapParam::FullChain(levels) => levels.max(1),
        }
    }
}

impl Image {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        width: u32,
        height: u32,
        mipmap_param: MipmapParam,
        format: vk::Format,
        tiling: vk::ImageTiling,
        usage: vk::ImageUsageFlags,
        memory_properties: vk::MemoryPropertyFlags,
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
    ) -> Result<Self> {
        let mip_levels = mipmap_param.level_count();

        let image_create_info = vk::ImageCreateInfo {
            image_type: vk::ImageType::TYPE_2D,
            extent: vk::Extent3D::builder()
                .height(height)
                .width(width)
                .depth(1)
                .build(),
            mip_levels,
            array_layers: 1,
            format,
            tiling,
            initial_layout: vk::ImageLayout::UNDEFINED,
            usage,
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            samples: vk::SampleCountFlags::TYPE_1,
            ..Default::default()
        };

        let vulkan_image = unsafe { logical_device.create_image(&image_create_info, None)? };

        let memory_requirements =
            unsafe { logical_device.get_image_memory_requirements(vulkan_image) };

        let memory = crate::buffers::memory::find_memory_type(
            instance,
            physical_device,
            memory_requirements.memory_type_bits,
            memory_properties,
        )
        .and_then(|memory_type_index| {
            let memory_alloc_info = vk::MemoryAllocateInfo {
                allocation_size: memory_requirements.size,
                memory_type_index,
                ..Default::default()
            };
            unsafe {
                let image_device_memory = logical_device.allocate_memory(&memory_alloc_info, None)?;
                if let Err(error) = logical_device.bind_image_memory(vulkan_image, image_device_memory, 0) {
                    logical_device.free_memory(image_device_memory, None);
                    return Err(VulkanError::from(error));
                }
                Ok(image_device_memory)
            }
        });

        let memory = match memory {
            Ok(memory) => memory,
            Err(error) => {
                unsafe { logical_device.destroy_image(vulkan_image, None) };
                return Err(error);
            }
        };

        Ok(Self {
            image: vulkan_image,
            width,
            height,
            memory,
            mip_levels,
        })
    }

    pub fn copy_buffer_to_image(
        &self,
        buffer: &Buffer,
        logical_device: &ash::Device,
        command_pool: vk::CommandPool,
        graphics_queue: vk::Queue,
    ) -> Result<()> {
        let command_buffer = begin_single_time_commands(logical_device, command_pool)?;

        let buffer_image_copy = vk::BufferImageCopy {
            buffer_offset: 0,
            // 0 for row_length and height just says pixels are tightly packed
            buffer_row_length: 0,
            buffer_image_height: 0,
            image_subresource: vk::ImageSubresourceLayers::builder()
                .aspect_mask(vk::ImageAspectFlags::COLOR)
                .mip_level(0)
                .base_array_layer(0)
                .layer_count(1)
                .build(),
            image_offset: vk::Offset3D { x: 0, y: 0, z: 0 },
            image_extent: vk::Extent3D {
                width: self.width,
                height: self.height,
                depth: 1,
            },
        };

        unsafe {
            logical_device.cmd_copy_buffer_to_image(
                command_buffer,
                buffer.buffer,
                self.image,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                &[buffer_image_copy],
            );
        }

        end_single_time_commands(command_buffer, logical_device, graphics_queue, command_pool)
    }

    /// Transitions every mip level of a color image.
    pub fn transition_image_layout(
        &self,
        old_layout: vk::ImageLayout,
        new_layout: vk::ImageLayout,
        logical_device: &ash::Device,
        command_pool: vk::CommandPool,
        graphics_queue: vk::Queue,
    ) -> Result<()> {
        let masks = transition_masks(old_layout, new_layout).ok_or_else(|| {
            VulkanError::ImageLayoutTransitionNotSupported(format!(
                "{:?} -> {:?}",
                old_layout, new_layout
            ))
        })?;

        let command_buffer = begin_single_time_commands(logical_device, command_pool)?;

        let image_memory_barrier = vk::ImageMemoryBarrier {
            old_layout,
            new_layout,
            src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
            dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
            image: self.image,
            subresource_range: color_subresource_range(0, self.mip_levels),
            src_access_mask: masks.src_access_mask,
            dst_access_mask: masks.dst_access_mask,
            ..Default::default()
        };

        unsafe {
            logical_device.cmd_pipeline_barrier(
                command_buffer,
                masks.src_stage_mask,
                masks.dst_stage_mask,
                vk::DependencyFlags::empty(),
                &[],
                &[],
                &[image_memory_barrier],
            );
        }

        end_single_time_commands(command_buffer, logical_device, graphics_queue, command_pool)
    }

    pub unsafe fn cleanup(self, logical_device: &ash::Device) {
        logical_device.destroy_image(self.image, None);
        logical_device.free_memory(self.memory, None);
    }
}

impl TextureImage {
    pub fn new(
        texture_source: &dyn TextureSource,
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        command_pool: vk::CommandPool,
        graphics_queue: vk::Queue,
    ) -> Result<Self> {
        let staging_buffer = Buffer::new_staging(
            instance,
            physical_device,
            logical_device,
            texture_source.get_pixels(),
        )?;

        let image = Self::upload(
            texture_source,
            &staging_buffer,
            instance,
            physical_device,
            logical_device,
            command_pool,
            graphics_queue,
        );
        unsafe {
            staging_buffer.cleanup(logical_device);
        }
        let image = image?;

        let view = match create_image_view(
            image.image,
            TEXTURE_FORMAT,
            vk::ImageAspectFlags::COLOR,
            image.mip_levels,
            logical_device,
        ) {
            Ok(view) => view,
            Err(error) => {
                unsafe { image.cleanup(logical_device) };
                return Err(error);
            }
        };

        let physical_device_properties =
            unsafe { instance.get_physical_device_properties(physical_device) };
        let sampler = match Self::create_texture_sampler(
            logical_device,
            &physical_device_properties,
            image.mip_levels,
        ) {
            Ok(sampler) => sampler,
            Err(error) => {
                unsafe {
                    logical_device.destroy_image_view(view, None);
                    image.cleanup(logical_device);
                }
                return Err(error);
            }
        };

        Ok(Self {
            image,
            view,
            sampler,
        })
    }

    fn upload(
        texture_source: &dyn TextureSource,
        staging_buffer: &Buffer,
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        command_pool: vk::CommandPool,
        graphics_queue: vk::Queue,
    ) -> Result<Image> {
        let format_properties = unsafe {
            instance.get_physical_device_format_properties(physical_device, TEXTURE_FORMAT)
        };
        let mipmap_param = choose_mipmap_param(&format_properties, texture_source.mip_levels());
        info!(
            "Uploading {}x{} texture with {} mip level(s)",
            texture_source.get_width(),
            texture_source.get_height(),
            mipmap_param.level_count()
        );

        let image = Image::new(
            texture_source.get_width(),
            texture_source.get_height(),
            mipmap_param,
            TEXTURE_FORMAT,
            vk::ImageTiling::OPTIMAL,
            // transfer src for the mip blits, transfer dst for the staging copy and sampled in the shader
            vk::ImageUsageFlags::TRANSFER_SRC
                | vk::ImageUsageFlags::TRANSFER_DST
                | vk::ImageUsageFlags::SAMPLED,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
            instance,
            physical_device,
            logical_device,
        )?;

        let recorded = image
            .transition_image_layout(
                vk::ImageLayout::UNDEFINED,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                logical_device,
                command_pool,
                graphics_queue,
            )
            .and_then(|_| {
                image.copy_buffer_to_image(
                    staging_buffer,
                    logical_device,
                    command_pool,
                    graphics_queue,
                )
            })
            .and_then(|_| match mipmap_param {
                // generating mipmaps leaves every level in the shader read layout
                MipmapParam::FullChain(_) => {
                    Self::generate_mipmaps(&image, logical_device, command_pool, graphics_queue)
                }
                MipmapParam::NoMipmap => image.transition_image_layout(
                    vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                    vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
                    logical_device,
                    command_pool,
                    graphics_queue,
                ),
            });

        match recorded {
            Ok(()) => Ok(image),
            Err(error) => {
                unsafe { image.cleanup(logical_device) };
                Err(error)
            }
        }
    }

    pub unsafe fn cleanup(self, logical_device: &ash::Device) {
        logical_device.destroy_sampler(self.sampler, None);
        logical_device.destroy_image_view(self.view, None);
        self.image.cleanup(logical_device);
    }

    pub fn create_texture_sampler(
        logical_device: &ash::Device,
        physical_device_properties: &vk::PhysicalDeviceProperties,
        mip_levels: u32,
    ) -> Result<vk::Sampler> {
        let sampler_create_info = vk::SamplerCreateInfo {
            mag_filter: vk::Filter::LINEAR,
            min_filter: vk::Filter::LINEAR,
            address_mode_u: vk::SamplerAddressMode::REPEAT,
            address_mode_v: vk::SamplerAddressMode::REPEAT,
            address_mode_w: vk::SamplerAddressMode::REPEAT,
            anisotropy_enable: vk::TRUE,
            max_anisotropy: physical_device_properties.limits.max_sampler_anisotropy,
            border_color: vk::BorderColor::INT_OPAQUE_BLACK,
            unnormalized_coordinates: vk::FALSE,
            compare_enable: vk::FALSE,
            compare_op: vk::CompareOp::ALWAYS,
            mipmap_mode: vk::SamplerMipmapMode::LINEAR,
            max_lod: mip_levels as f32,
            min_lod: 0.0,
            mip_lod_bias: 0.0,
            ..Default::default()
        };

        let sampler = unsafe { logical_device.create_sampler(&sampler_create_info, None)? };

        Ok(sampler)
    }

    fn generate_mipmaps(
        image: &Image,
        logical_device: &ash::Device,
        command_pool: vk::CommandPool,
        graphics_queue: vk::Queue,
    ) -> Result<()> {
        let command_buffer = begin_single_time_commands(logical_device, command_pool)?;

        let mut memory_barrier = vk::ImageMemoryBarrier {
            image: image.image,
            src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
            dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
            subresource_range: color_subresource_range(0, 1),
            ..Default::default()
        };

        let mut prev_mip_width = i32::try_from(image.width)?;
        let mut prev_mip_height = i32::try_from(image.height)?;

        for cur_mip_level in 1..image.mip_levels {
            let cur_mip_width = next_mip_dimension(prev_mip_width);
            let cur_mip_height = next_mip_dimension(prev_mip_height);
            let prev_mip_level = cur_mip_level - 1;

            // previous level becomes the blit source once its transfer write is done
            memory_barrier.subresource_range.base_mip_level = prev_mip_level;
            memory_barrier.old_layout = vk::ImageLayout::TRANSFER_DST_OPTIMAL;
            memory_barrier.new_layout = vk::ImageLayout::TRANSFER_SRC_OPTIMAL;
            memory_barrier.src_access_mask = vk::AccessFlags::TRANSFER_WRITE;
            memory_barrier.dst_access_mask = vk::AccessFlags::TRANSFER_READ;

            unsafe {
                logical_device.cmd_pipeline_barrier(
                    command_buffer,
                    vk::PipelineStageFlags::TRANSFER,
                    vk::PipelineStageFlags::TRANSFER,
                    vk::DependencyFlags::empty(),
                    &[],
                    &[],
                    &[memory_barrier],
                );
            }

            let image_blit = vk::ImageBlit {
                src_offsets: [
                    vk::Offset3D { x: 0, y: 0, z: 0 },
                    vk::Offset3D {
                        x: prev_mip_width,
                        y: prev_mip_height,
                        z: 1,
                    },
                ],
                src_subresource: color_subresource_layers(prev_mip_level),
                dst_offsets: [
                    vk::Offset3D { x: 0, y: 0, z: 0 },
                    vk::Offset3D {
                        x: cur_mip_width,
                        y: cur_mip_height,
                        z: 1,
                    },
                ],
                dst_subresource: color_subresource_layers(cur_mip_level),
            };

            unsafe {
                logical_device.cmd_blit_image(
                    command_buffer,
                    image.image,
                    vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
                    image.image,
                    vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                    &[image_blit],
                    vk::Filter::LINEAR,
                );
            }

            memory_barrier.old_layout = vk::ImageLayout::TRANSFER_SRC_OPTIMAL;
            memory_barrier.new_layout = vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL;
            memory_barrier.src_access_mask = vk::AccessFlags::TRANSFER_READ;
            memory_barrier.dst_access_mask = vk::AccessFlags::SHADER_READ;

            unsafe {
                logical_device.cmd_pipeline_barrier(
                    command_buffer,
                    vk::PipelineStageFlags::TRANSFER,
                    vk::PipelineStageFlags::FRAGMENT_SHADER,
                    vk::DependencyFlags::empty(),
                    &[],
                    &[],
                    &[memory_barrier],
                );
            }

            prev_mip_width = cur_mip_width;
            prev_mip_height = cur_mip_height;
        }

        // the last level is never a blit source so the loop does not transition it
        memory_barrier.subresource_range.base_mip_level = image.mip_levels - 1;
        memory_barrier.old_layout = vk::ImageLayout::TRANSFER_DST_OPTIMAL;
        memory_barrier.new_layout = vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL;
        memory_barrier.src_access_mask = vk::AccessFlags::TRANSFER_WRITE;
        memory_barrier.dst_access_mask = vk::AccessFlags::SHADER_READ;

        unsafe {
            logical_device.cmd_pipeline_barrier(
                command_buffer,
                vk::PipelineStageFlags::TRANSFER,
                vk::PipelineStageFlags::FRAGMENT_SHADER,
                vk::DependencyFlags::empty(),
                &[],
                &[],
                &[memory_barrier],
            );
        }

        end_single_time_commands(command_buffer, logical_device, graphics_queue, command_pool)
    }
}
//////////////////////// Fns ///////////////////////
pub fn create_image_view(
    image: vk::Image,
    format: vk::Format,
    aspect_flags: vk::ImageAspectFlags,
    mip_levels: u32,
    logical_device: &ash::Device,
) -> Result<vk::ImageView> {
    let image_view_create_info = vk::ImageViewCreateInfo {
        image,
        view_type: vk::ImageViewType::TYPE_2D,
        format,
        components: vk::ComponentMapping {
            r: vk::ComponentSwizzle::IDENTITY,
            g: vk::ComponentSwizzle::IDENTITY,
            b: vk::ComponentSwizzle::IDENTITY,
            a: vk::ComponentSwizzle::IDENTITY,
        },
        subresource_range: vk::ImageSubresourceRange::builder()
            .aspect_mask(aspect_flags)
            .base_mip_level(0)
            .level_count(mip_levels)
            .base_array_layer(0)
            .layer_count(1)
            .build(),
        ..Default::default()
    };

    let image_view = unsafe { logical_device.create_image_view(&image_view_create_info, None)? };

    Ok(image_view)
}

/// Blitting mip levels needs linear filtering on the texture format, otherwise only level 0 is kept.
fn choose_mipmap_param(format_properties: &vk::FormatProperties, full_chain: u32) -> MipmapParam {
    if format_properties
        .optimal_tiling_features
        .contains(vk::FormatFeatureFlags::SAMPLED_IMAGE_FILTER_LINEAR)
    {
        MipmapParam::FullChain(full_chain)
    } else {
        warn!("Texture format does not support linear blitting, skipping mipmaps");
        MipmapParam::NoMipmap
    }
}

fn next_mip_dimension(previous: i32) -> i32 {
    if previous > 1 {
        previous / 2
    } else {
        1
    }
}

fn transition_masks(
    old_layout: vk::ImageLayout,
    new_layout: vk::ImageLayout,
) -> Option<TransitionMasks> {
    match (old_layout, new_layout) {
        (vk::ImageLayout::UNDEFINED, vk::ImageLayout::TRANSFER_DST_OPTIMAL) => {
            Some(TransitionMasks {
                src_access_mask: vk::AccessFlags::empty(),
                dst_access_mask: vk::AccessFlags::TRANSFER_WRITE,
                src_stage_mask: vk::PipelineStageFlags::TOP_OF_PIPE,
                dst_stage_mask: vk::PipelineStageFlags::TRANSFER,
            })
        }
        (vk::ImageLayout::TRANSFER_DST_OPTIMAL, vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL) => {
            Some(TransitionMasks {
                src_access_mask: vk::AccessFlags::TRANSFER_WRITE,
                dst_access_mask: vk::AccessFlags::SHADER_READ,
                src_stage_mask: vk::PipelineStageFlags::TRANSFER,
                dst_stage_mask: vk::PipelineStageFlags::FRAGMENT_SHADER,
            })
        }
        _ => None,
    }
}

fn color_subresource_range(base_mip_level: u32, level_count: u32) -> vk::ImageSubresourceRange {
    vk::ImageSubresourceRange {
        aspect_mask: vk::ImageAspectFlags::COLOR,
        base_mip_level,
        level_count,
        base_array_layer: 0,
        layer_count: 1,
    }
}

fn color_subresource_layers(mip_level: u32) -> vk::ImageSubresourceLayers {
    vk::ImageSubresourceLayers {
        aspect_mask: vk::ImageAspectFlags::COLOR,
        mip_level,
        base_array_layer: 0,
        layer_count: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mipmaps_need_linear_filtering() {
        let with_linear = vk::FormatProperties {
            optimal_tiling_features: vk::FormatFeatureFlags::SAMPLED_IMAGE_FILTER_LINEAR,
            ..Default::default()
        };
        assert_eq!(
            choose_mipmap_param(&with_linear, 9),
            MipmapParam::FullChain(9)
        );
        assert_eq!(
            choose_mipmap_param(&vk::FormatProperties::default(), 9),
            MipmapParam::NoMipmap
        );
        assert_eq!(MipmapParam::NoMipmap.level_count(), 1);
        assert_eq!(MipmapParam::FullChain(0).level_count(), 1);
    }

    #[test]
    fn mip_dimensions_halve_down_to_one() {
        let mut dimension = 256;
        let mut levels = 1;
        while dimension > 1 {
            dimension = next_mip_dimension(dimension);
            levels += 1;
        }
        assert_eq!(levels, cube_common::texture::mip_levels(256, 256));
        assert_eq!(next_mip_dimension(1), 1);
        assert_eq!(next_mip_dimension(3), 1);
    }

    #[test]
    fn only_upload_transitions_are_supported() {
        let upload = transition_masks(
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        )
        .unwrap();
        assert_eq!(upload.dst_access_mask, vk::AccessFlags::TRANSFER_WRITE);
        assert_eq!(upload.src_stage_mask, vk::PipelineStageFlags::TOP_OF_PIPE);

        let sample = transition_masks(
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        )
        .unwrap();
        assert_eq!(sample.dst_stage_mask, vk::PipelineStageFlags::FRAGMENT_SHADER);

        assert!(transition_masks(
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::PRESENT_SRC_KHR
        )
        .is_none());
    }
}
