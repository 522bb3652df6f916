use crate::util::result::{Result, VulkanError};

use ash::version::InstanceV1_0;
use ash::vk;

/// Preferred depth formats, best first.
pub const DEPTH_FORMAT_CANDIDATES: [vk::Format; 3] = [
    vk::Format::D32_SFLOAT,
    vk::Format::D32_SFLOAT_S8_UINT,
    vk::Format::D24_UNORM_S8_UINT,
];

pub fn has_stencil_component(format: vk::Format) -> bool {
    format == vk::Format::D32_SFLOAT_S8_UINT || format == vk::Format::D24_UNORM_S8_UINT
}

pub fn find_depth_format(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
) -> Result<vk::Format> {
    find_supported_format(
        &DEPTH_FORMAT_CANDIDATES,
        vk::ImageTiling::OPTIMAL,
        vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
        |format| unsafe { instance.get_physical_device_format_properties(physical_device, format) },
    )
}

fn find_supported_format<F>(
    candidates: &[vk::Format],
    tiling: vk::ImageTiling,
    features: vk::FormatFeatureFlags,
    format_properties: F,
) -> Result<vk::Format>
where
    F: Fn(vk::Format) -> vk::FormatProperties,
{
    candidates
        .iter()
        .copied()
        .find(|&candidate_format| {
            let props = format_properties(candidate_format);
            match tiling {
                vk::ImageTiling::LINEAR => props.linear_tiling_features.contains(features),
                vk::ImageTiling::OPTIMAL => props.optimal_tiling_features.contains(features),
                _ => false,
            }
        })
        .ok_or(VulkanError::DepthFailedToFindSupportedFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth_capable() -> vk::FormatProperties {
        vk::FormatProperties {
            optimal_tiling_features: vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
            ..Default::default()
        }
    }

    #[test]
    fn picks_first_supported_candidate() {
        let format = find_supported_format(
            &DEPTH_FORMAT_CANDIDATES,
            vk::ImageTiling::OPTIMAL,
            vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
            |format| {
                if format == vk::Format::D32_SFLOAT {
                    vk::FormatProperties::default()
                } else {
                    depth_capable()
                }
            },
        )
        .unwrap();
        assert_eq!(format, vk::Format::D32_SFLOAT_S8_UINT);
        assert!(has_stencil_component(format));
    }

    #[test]
    fn linear_features_do_not_count_for_optimal_tiling() {
        let result = find_supported_format(
            &DEPTH_FORMAT_CANDIDATES,
            vk::ImageTiling::OPTIMAL,
            vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
            |_| vk::FormatProperties {
                linear_tiling_features: vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
                ..Default::default()
            },
        );
        assert!(matches!(
            result,
            Err(VulkanError::DepthFailedToFindSupportedFormat)
        ));
        assert!(!has_stencil_component(vk::Format::D32_SFLOAT));
    }
}
