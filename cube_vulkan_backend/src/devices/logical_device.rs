use crate::devices::queues::QueueFamilyIndices;
use crate::devices::requirements::DeviceRequirements;
use crate::util::result::Result;
use crate::util::validation::VulkanValidation;

use ash::version::InstanceV1_0;
use ash::vk;
//////////////////////// Fns ///////////////////////
pub fn create_logical_device(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    queue_indices: &QueueFamilyIndices,
    requirements: &DeviceRequirements,
    validation: &VulkanValidation,
) -> Result<ash::Device> {
    let queue_priorities = [1.0_f32];
    let queue_create_infos: Vec<vk::DeviceQueueCreateInfo> = queue_indices
        .unique_families()
        .into_iter()
        .map(|queue_family_index| {
            vk::DeviceQueueCreateInfo::builder()
                .queue_family_index(queue_family_index)
                .queue_priorities(&queue_priorities)
                .build()
        })
        .collect();

    let device_features = vk::PhysicalDeviceFeatures {
        sampler_anisotropy: vk::TRUE,
        ..vk::PhysicalDeviceFeatures::default()
    };

    let enabled_extension_names = requirements.get_enabled_extension_names();

    // device layers are deprecated but older loaders still read them
    let device_create_info = vk::DeviceCreateInfo {
        queue_create_info_count: queue_create_infos.len() as u32,
        p_queue_create_infos: queue_create_infos.as_ptr(),
        p_enabled_features: &device_features,
        enabled_layer_count: validation.get_enabled_layer_count(),
        pp_enabled_layer_names: validation.get_enabled_layer_names(),
        enabled_extension_count: requirements.get_enabled_extension_count(),
        pp_enabled_extension_names: enabled_extension_names.as_ptr(),
        ..vk::DeviceCreateInfo::default()
    };

    let logical_device =
        unsafe { instance.create_device(physical_device, &device_create_info, None)? };

    Ok(logical_device)
}
