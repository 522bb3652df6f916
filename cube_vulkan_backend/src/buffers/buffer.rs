use crate::buffers::memory::{self, MemoryCopyable};
use crate::drawing::command_buffers::{begin_single_time_commands, end_single_time_commands};
use crate::util::result::Result;

use ash::version::DeviceV1_0;
use ash::vk;
use std::convert::TryFrom;
//////////////////////// Structs ///////////////////////
#[derive(Default)]
pub struct Buffer {
    pub buffer: vk::Buffer,
    pub memory: vk::DeviceMemory,
}
//////////////////////// Impls ///////////////////////
impl Buffer {
    pub fn new(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
        memory_property_requirements: vk::MemoryPropertyFlags,
    ) -> Result<Self> {
        let buffer_create_info = vk::BufferCreateInfo {
            size,
            usage,
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            ..Default::default()
        };

        let buffer = unsafe { logical_device.create_buffer(&buffer_create_info, None)? };
        let memory = memory::create_device_memory(
            instance,
            physical_device,
            logical_device,
            buffer,
            memory_property_requirements,
        )?;

        Ok(Self { buffer, memory })
    }

    /// Host visible buffer holding a copy of `data`, used as the source of a transfer.
    pub fn new_staging<T>(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        data: &T,
    ) -> Result<Self>
    where
        T: MemoryCopyable + ?Sized,
    {
        let staging_buffer = Buffer::new(
            instance,
            physical_device,
            logical_device,
            vk::DeviceSize::try_from(data.byte_size())?,
            vk::BufferUsageFlags::TRANSFER_SRC,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        )?;
        unsafe {
            memory::fill_buffer(logical_device, staging_buffer.memory, data)?;
        }
        Ok(staging_buffer)
    }

    /// Uploads `data` into a device local buffer through a staging buffer.
    pub fn create_and_fill<T>(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        command_pool: vk::CommandPool,
        graphics_queue: vk::Queue,
        data: &T,
        usage: vk::BufferUsageFlags,
    ) -> Result<Self>
    where
        T: MemoryCopyable + ?Sized,
    {
        let buffer_size = vk::DeviceSize::try_from(data.byte_size())?;
        let staging_buffer = Self::new_staging(instance, physical_device, logical_device, data)?;

        let result_buffer = Buffer::new(
            instance,
            physical_device,
            logical_device,
            buffer_size,
            vk::BufferUsageFlags::TRANSFER_DST | usage,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        )?;

        let copied = copy_buffer(
            staging_buffer.buffer,
            result_buffer.buffer,
            buffer_size,
            logical_device,
            command_pool,
            graphics_queue,
        );

        unsafe {
            staging_buffer.cleanup(logical_device);
        }
        if let Err(error) = copied {
            unsafe { result_buffer.cleanup(logical_device) };
            return Err(error);
        }

        Ok(result_buffer)
    }

    pub unsafe fn cleanup(self, logical_device: &ash::Device) {
        logical_device.destroy_buffer(self.buffer, None);
        logical_device.free_memory(self.memory, None);
    }
}
//////////////////////// Fns ///////////////////////
pub fn copy_buffer(
    src_buffer: vk::Buffer,
    dst_buffer: vk::Buffer,
    size: vk::DeviceSize,
    logical_device: &ash::Device,
    command_pool: vk::CommandPool,
    graphics_queue: vk::Queue,
) -> Result<()> {
    let command_buffer = begin_single_time_commands(logical_device, command_pool)?;

    let copy_regions = [vk::BufferCopy {
        size,
        ..Default::default()
    }];
    unsafe {
        logical_device.cmd_copy_buffer(command_buffer, src_buffer, dst_buffer, &copy_regions);
    }

    end_single_time_commands(command_buffer, logical_device, graphics_queue, command_pool)
}
