use crate::presentation::swap_chain::SwapChainSupportDetails;

use ash::extensions::khr::Swapchain;
use ash::vk;
use std::ffi::CStr;
use std::os::raw::c_char;

/// What a GPU has to offer before we try to draw the cube with it.
pub struct DeviceRequirements {
    pub required_device_extensions: Vec<&'static CStr>,
    pub is_swap_chain_adequate_check: fn(&SwapChainSupportDetails) -> bool,
    pub supported_features_check: fn(&vk::PhysicalDeviceFeatures) -> bool,
}

impl DeviceRequirements {
    pub fn new(
        required_device_extensions: &[&'static CStr],
        is_swap_chain_adequate_check: fn(&SwapChainSupportDetails) -> bool,
        supported_features_check: fn(&vk::PhysicalDeviceFeatures) -> bool,
    ) -> Self {
        Self {
            required_device_extensions: required_device_extensions.to_vec(),
            is_swap_chain_adequate_check,
            supported_features_check,
        }
    }

    /// Swapchain support, at least one format and present mode, and anisotropic sampling for the texture.
    pub fn for_cube() -> Self {
        Self::new(
            &[Swapchain::name()],
            |details| !details.formats.is_empty() && !details.present_modes.is_empty(),
            |features| features.sampler_anisotropy == vk::TRUE,
        )
    }

    pub fn get_enabled_extension_count(&self) -> u32 {
        self.required_device_extensions.len() as u32
    }

    pub fn get_enabled_extension_names(&self) -> Vec<*const c_char> {
        self.required_device_extensions
            .iter()
            .map(|name| name.as_ptr())
            .collect()
    }

    pub fn missing_extensions(&self, available: &[String]) -> Vec<&'static CStr> {
        self.required_device_extensions
            .iter()
            .copied()
            .filter(|required| {
                let required = required.to_string_lossy();
                !available.iter().any(|name| *name == required)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_needs_swapchain_extension() {
        let requirements = DeviceRequirements::for_cube();
        assert_eq!(requirements.get_enabled_extension_count(), 1);

        let missing = requirements.missing_extensions(&["VK_KHR_maintenance1".to_owned()]);
        assert_eq!(missing, vec![Swapchain::name()]);

        let missing = requirements.missing_extensions(&["VK_KHR_swapchain".to_owned()]);
        assert!(missing.is_empty());
    }

    #[test]
    fn swap_chain_check_needs_formats_and_modes() {
        let requirements = DeviceRequirements::for_cube();
        let mut details = SwapChainSupportDetails {
            capabilities: vk::SurfaceCapabilitiesKHR::default(),
            formats: vec![],
            present_modes: vec![vk::PresentModeKHR::FIFO],
        };
        assert!(!(requirements.is_swap_chain_adequate_check)(&details));
        details.formats.push(vk::SurfaceFormatKHR::default());
        assert!((requirements.is_swap_chain_adequate_check)(&details));
    }

    #[test]
    fn feature_check_needs_anisotropy() {
        let requirements = DeviceRequirements::for_cube();
        let mut features = vk::PhysicalDeviceFeatures::default();
        assert!(!(requirements.supported_features_check)(&features));
        features.sampler_anisotropy = vk::TRUE;
        assert!((requirements.supported_features_check)(&features));
    }
}
