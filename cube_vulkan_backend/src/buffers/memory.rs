use crate::util::result::{Result, VulkanError};

use ash::version::{DeviceV1_0, InstanceV1_0};
use ash::vk;
use cube_common::mesh::CubeVertex;
use std::convert::TryFrom;

/// Plain data that can be memcpy'd into mapped device memory.
pub trait MemoryCopyable {
    fn byte_size(&self) -> usize;
    unsafe fn copy_to_mapped_memory(&self, data_target_ptr: *mut std::ffi::c_void);
}

impl MemoryCopyable for [u8] {
    fn byte_size(&self) -> usize {
        self.len()
    }

    unsafe fn copy_to_mapped_memory(&self, data_target_ptr: *mut std::ffi::c_void) {
        let data_ptr = data_target_ptr as *mut u8;
        data_ptr.copy_from_nonoverlapping(self.as_ptr(), self.len());
    }
}

impl MemoryCopyable for [CubeVertex] {
    fn byte_size(&self) -> usize {
        std::mem::size_of_val(self)
    }

    unsafe fn copy_to_mapped_memory(&self, data_target_ptr: *mut std::ffi::c_void) {
        let data_ptr = data_target_ptr as *mut CubeVertex;
        data_ptr.copy_from_nonoverlapping(self.as_ptr(), self.len());
    }
}

pub fn create_device_memory(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    logical_device: &ash::Device,
    buffer: vk::Buffer,
    memory_property_requirements: vk::MemoryPropertyFlags,
) -> Result<vk::DeviceMemory> {
    let memory_requirements = unsafe { logical_device.get_buffer_memory_requirements(buffer) };

    let memory_type_index = find_memory_type(
        instance,
        physical_device,
        memory_requirements.memory_type_bits,
        memory_property_requirements,
    )?;

    let memory_allocate_info = vk::MemoryAllocateInfo {
        allocation_size: memory_requirements.size,
        memory_type_index,
        ..Default::default()
    };

    let device_memory = unsafe { logical_device.allocate_memory(&memory_allocate_info, None)? };
    unsafe { logical_device.bind_buffer_memory(buffer, device_memory, 0)? }

    Ok(device_memory)
}

/// Maps `memory`, copies `data` to it and unmaps. The memory has to be HOST_VISIBLE and,
/// since there is no explicit flush, HOST_COHERENT.
pub unsafe fn fill_buffer<T>(
    logical_device: &ash::Device,
    memory: vk::DeviceMemory,
    data: &T,
) -> Result<()>
where
    T: MemoryCopyable + ?Sized,
{
    let size = vk::DeviceSize::try_from(data.byte_size())?;
    let data_ptr = logical_device.map_memory(memory, 0, size, vk::MemoryMapFlags::empty())?;
    if data_ptr.is_null() {
        return Err(VulkanError::MemoryMapFailed(size));
    }
    data.copy_to_mapped_memory(data_ptr);
    logical_device.unmap_memory(memory);
    Ok(())
}

pub fn find_memory_type(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    type_filter_bitfield: u32,
    required_properties: vk::MemoryPropertyFlags,
) -> Result<u32> {
    let mem_properties = unsafe { instance.get_physical_device_memory_properties(physical_device) };
    select_memory_type(&mem_properties, type_filter_bitfield, required_properties)
        .ok_or(VulkanError::MemoryFailedToFindType)
}

/// First memory type allowed by the filter bits that has all the required properties.
pub fn select_memory_type(
    mem_properties: &vk::PhysicalDeviceMemoryProperties,
    type_filter_bitfield: u32,
    required_properties: vk::MemoryPropertyFlags,
) -> Option<u32> {
    mem_properties.memory_types[..mem_properties.memory_type_count as usize]
        .iter()
        .enumerate()
        .find(|(i, mem_type)| {
            type_filter_bitfield & (1 << i) != 0
                && mem_type.property_flags.contains(required_properties)
        })
        .map(|(i, _)| i as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_properties(types: &[vk::MemoryPropertyFlags]) -> vk::PhysicalDeviceMemoryProperties {
        let mut props = vk::PhysicalDeviceMemoryProperties {
            memory_type_count: types.len() as u32,
            ..Default::default()
        };
        for (i, flags) in types.iter().enumerate() {
            props.memory_types[i].property_flags = *flags;
        }
        props
    }

    #[test]
    fn picks_first_allowed_type_with_required_flags() {
        let host = vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;
        let props = memory_properties(&[
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
            host,
            host | vk::MemoryPropertyFlags::DEVICE_LOCAL,
        ]);
        assert_eq!(select_memory_type(&props, 0b111, host), Some(1));
        assert_eq!(select_memory_type(&props, 0b100, host), Some(2));
        assert_eq!(
            select_memory_type(&props, 0b111, vk::MemoryPropertyFlags::DEVICE_LOCAL),
            Some(0)
        );
    }

    #[test]
    fn filter_bits_and_type_count_are_respected() {
        let props = memory_properties(&[vk::MemoryPropertyFlags::HOST_VISIBLE]);
        assert_eq!(
            select_memory_type(&props, 0b10, vk::MemoryPropertyFlags::HOST_VISIBLE),
            None
        );
        // types past memory_type_count are zeroed and must never match an empty requirement
        assert_eq!(
            select_memory_type(&props, u32::MAX, vk::MemoryPropertyFlags::empty()),
            Some(0)
        );
        assert_eq!(
            select_memory_type(&props, 0b10, vk::MemoryPropertyFlags::empty()),
            None
        );
    }

    #[test]
    fn vertex_slices_report_their_byte_size() {
        let vertices = &cube_common::mesh::CUBE_VERTICES[..];
        assert_eq!(vertices.byte_size(), 720);
        let bytes: &[u8] = &[1, 2, 3];
        assert_eq!(bytes.byte_size(), 3);
    }
}
