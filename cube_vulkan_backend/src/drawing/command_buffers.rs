use crate::buffers::vertex_buffer::VertexBuffer;
use crate::devices::queues::QueueFamilyIndices;
use crate::graphics_pipeline::GraphicsPipeline;
use crate::presentation::swap_chain::SwapChainContainer;
use crate::uniforms::descriptors::DescriptorData;
use crate::util::result::{Result, VulkanError};

use ash::version::DeviceV1_0;
use ash::vk;

use std::convert::TryFrom;

pub fn create_command_pool(
    logical_device: &ash::Device,
    queue_family_indices: &QueueFamilyIndices,
) -> Result<vk::CommandPool> {
    let pool_info = vk::CommandPoolCreateInfo {
        queue_family_index: queue_family_indices.graphics_family,
        ..Default::default()
    };

    let command_pool = unsafe { logical_device.create_command_pool(&pool_info, None)? };
    Ok(command_pool)
}

pub fn begin_single_time_commands(
    logical_device: &ash::Device,
    command_pool: vk::CommandPool,
) -> Result<vk::CommandBuffer> {
    let cb_alloc_info = vk::CommandBufferAllocateInfo {
        level: vk::CommandBufferLevel::PRIMARY,
        command_pool,
        command_buffer_count: 1,
        ..Default::default()
    };

    let command_buffer = unsafe { logical_device.allocate_command_buffers(&cb_alloc_info)? }
        .first()
        .copied()
        .ok_or(VulkanError::CommandBufferNotAvailable(0))?;

    let cb_begin_info = vk::CommandBufferBeginInfo {
        flags: vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT,
        ..Default::default()
    };
    unsafe {
        logical_device.begin_command_buffer(command_buffer, &cb_begin_info)?;
    }

    Ok(command_buffer)
}

/// Submits and blocks until the queue is idle. Only used for one-off uploads.
pub fn end_single_time_commands(
    command_buffer: vk::CommandBuffer,
    logical_device: &ash::Device,
    graphics_queue: vk::Queue,
    command_pool: vk::CommandPool,
) -> Result<()> {
    let command_buffers = [command_buffer];
    let submit_info = [vk::SubmitInfo::builder()
        .command_buffers(&command_buffers)
        .build()];

    unsafe {
        logical_device.end_command_buffer(command_buffer)?;
        logical_device.queue_submit(graphics_queue, &submit_info, vk::Fence::null())?;
        logical_device.queue_wait_idle(graphics_queue)?;
        logical_device.free_command_buffers(command_pool, &command_buffers);
    }

    Ok(())
}

/// One pre-recorded buffer per framebuffer: clear, bind, draw the 36 cube vertices.
pub fn create_command_buffers(
    logical_device: &ash::Device,
    command_pool: vk::CommandPool,
    framebuffers: &[vk::Framebuffer],
    graphics_pipeline: &GraphicsPipeline,
    swap_chain_container: &SwapChainContainer,
    vertex_buffer: &VertexBuffer,
    descriptor_data: &DescriptorData,
) -> Result<Vec<vk::CommandBuffer>> {
    let allocate_info = vk::CommandBufferAllocateInfo {
        command_pool,
        command_buffer_count: u32::try_from(framebuffers.len())?,
        level: vk::CommandBufferLevel::PRIMARY,
        ..Default::default()
    };

    let command_buffers = unsafe { logical_device.allocate_command_buffers(&allocate_info)? };
    let clear_values = GraphicsPipeline::clear_values();

    for (i, (&command_buffer, &framebuffer)) in
        command_buffers.iter().zip(framebuffers.iter()).enumerate()
    {
        let descriptor_set = *descriptor_data
            .descriptor_sets
            .get(i)
            .ok_or(VulkanError::DescriptorSetNotAvailable(i))?;

        let render_pass_begin_info = vk::RenderPassBeginInfo::builder()
            .render_pass(graphics_pipeline.render_pass)
            .framebuffer(framebuffer)
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent: swap_chain_container.swap_chain_extent,
            })
            .clear_values(&clear_values);

        unsafe {
            logical_device
                .begin_command_buffer(command_buffer, &vk::CommandBufferBeginInfo::default())?;

            logical_device.cmd_begin_render_pass(
                command_buffer,
                &render_pass_begin_info,
                vk::SubpassContents::INLINE,
            );
            logical_device.cmd_bind_pipeline(
                command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                graphics_pipeline.pipeline,
            );
            logical_device.cmd_bind_vertex_buffers(
                command_buffer,
                0,
                &[vertex_buffer.data.buffer],
                &[0],
            );
            logical_device.cmd_bind_descriptor_sets(
                command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                graphics_pipeline.pipeline_layout,
                0,
                &[descriptor_set],
                &[],
            );
            // no index buffer and no instancing
            logical_device.cmd_draw(command_buffer, vertex_buffer.vertex_count, 1, 0, 0);
            logical_device.cmd_end_render_pass(command_buffer);

            logical_device.end_command_buffer(command_buffer)?;
        }
    }

    Ok(command_buffers)
}
