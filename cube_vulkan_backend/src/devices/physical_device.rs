use crate::devices::queues::QueueFamilyIndices;
use crate::devices::requirements::DeviceRequirements;
use crate::presentation::swap_chain::SwapChainSupportDetails;
use crate::util::platform::SurfaceContainer;
use crate::util::result::{Result, VulkanError};
use crate::util::tools;

use log::{debug, info};

use ash::version::InstanceV1_0;
use ash::vk;
use ash::vk::{version_major, version_minor, version_patch};

struct RatedPhysicalDevice {
    rating: u32,
    physical_device: vk::PhysicalDevice,
    description: String,
}

/// Discrete GPUs first. Zero is never returned so that any device that passes the requirements
/// can still be picked.
pub fn rate_device_type(device_type: vk::PhysicalDeviceType) -> u32 {
    match device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => 1000,
        vk::PhysicalDeviceType::INTEGRATED_GPU => 100,
        vk::PhysicalDeviceType::VIRTUAL_GPU => 10,
        _ => 1,
    }
}

// the device is implicitly destroyed when instance is destroyed
pub fn pick_physical_device(
    instance: &ash::Instance,
    surface_container: &SurfaceContainer,
    requirements: &DeviceRequirements,
) -> Result<vk::PhysicalDevice> {
    let physical_devices = unsafe { instance.enumerate_physical_devices()? };
    if physical_devices.is_empty() {
        return Err(VulkanError::PhysicalDeviceNoGpu);
    }

    let mut best: Option<RatedPhysicalDevice> = None;
    for &physical_device in physical_devices.iter() {
        if let Some(rated) =
            rate_physical_device(instance, physical_device, surface_container, requirements)?
        {
            if best.as_ref().map_or(true, |b| rated.rating > b.rating) {
                best = Some(rated);
            }
        }
    }

    let best = best.ok_or(VulkanError::PhysicalDeviceNoGpu)?;
    info!(
        "Picked physical device {} (rating {})",
        best.description, best.rating
    );
    Ok(best.physical_device)
}

/// `None` when the device cannot draw the cube.
fn rate_physical_device(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    surface_container: &SurfaceContainer,
    requirements: &DeviceRequirements,
) -> Result<Option<RatedPhysicalDevice>> {
    let properties = unsafe { instance.get_physical_device_properties(physical_device) };
    let features = unsafe { instance.get_physical_device_features(physical_device) };

    let description = format!(
        "{} [{:?}, api {}.{}.{}]",
        tools::vk_to_string(&properties.device_name)?,
        properties.device_type,
        version_major(properties.api_version),
        version_minor(properties.api_version),
        version_patch(properties.api_version),
    );

    let available_extensions = unsafe { instance.enumerate_device_extension_properties(physical_device)? }
        .iter()
        .map(|extension| tools::vk_to_string(&extension.extension_name))
        .collect::<Result<Vec<String>>>()?;
    let missing = requirements.missing_extensions(&available_extensions);
    if !missing.is_empty() {
        debug!("{} skipped, missing extensions {:?}", description, missing);
        return Ok(None);
    }

    if !(requirements.supported_features_check)(&features) {
        debug!("{} skipped, missing features", description);
        return Ok(None);
    }

    if QueueFamilyIndices::find(instance, physical_device, surface_container).is_err() {
        debug!("{} skipped, no graphics and present queues", description);
        return Ok(None);
    }

    let support = SwapChainSupportDetails::query_support(physical_device, surface_container)?;
    if !(requirements.is_swap_chain_adequate_check)(&support) {
        debug!("{} skipped, inadequate swap chain support", description);
        return Ok(None);
    }

    Ok(Some(RatedPhysicalDevice {
        rating: rate_device_type(properties.device_type),
        physical_device,
        description,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_beats_integrated_beats_cpu() {
        let discrete = rate_device_type(vk::PhysicalDeviceType::DISCRETE_GPU);
        let integrated = rate_device_type(vk::PhysicalDeviceType::INTEGRATED_GPU);
        let cpu = rate_device_type(vk::PhysicalDeviceType::CPU);
        assert!(discrete > integrated);
        assert!(integrated > cpu);
        assert!(cpu > 0);
    }
}
