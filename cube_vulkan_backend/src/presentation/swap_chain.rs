use crate::devices::queues::QueueFamilyIndices;
use crate::util::platform::SurfaceContainer;
use crate::util::result::{Result, VulkanError};
use crate::window::WindowSize;

use ash::extensions::khr;
use ash::vk;
use log::info;

pub struct SwapChainSupportDetails {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapChainSupportDetails {
    pub fn query_support(
        physical_device: vk::PhysicalDevice,
        surface: &SurfaceContainer,
    ) -> Result<Self> {
        let (capabilities, formats, present_modes) = unsafe {
            let loader = &surface.surface_loader;
            (
                loader.get_physical_device_surface_capabilities(physical_device, surface.surface)?,
                loader.get_physical_device_surface_formats(physical_device, surface.surface)?,
                loader.get_physical_device_surface_present_modes(physical_device, surface.surface)?,
            )
        };

        Ok(Self {
            capabilities,
            formats,
            present_modes,
        })
    }
}

// swap extent is the resolution of the images we are writing to
pub fn choose_swap_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    window_size: &WindowSize,
) -> vk::Extent2D {
    // u32::MAX means the window manager lets us pick the size
    if capabilities.current_extent.width != u32::MAX {
        return capabilities.current_extent;
    }
    vk::Extent2D {
        width: window_size.width.clamp(
            capabilities.min_image_extent.width,
            capabilities.max_image_extent.width,
        ),
        height: window_size.height.clamp(
            capabilities.min_image_extent.height,
            capabilities.max_image_extent.height,
        ),
    }
}

/// FIFO waits for vblank, which is what keeps the cube from spinning the GPU at full speed.
/// It is the one mode every implementation has to support.
pub fn choose_swap_present_mode(_present_modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    vk::PresentModeKHR::FIFO
}

pub fn choose_swap_surface_format(
    formats: &[vk::SurfaceFormatKHR],
) -> Result<vk::SurfaceFormatKHR> {
    let srgb = formats.iter().find(|format| {
        format.format == vk::Format::B8G8R8A8_SRGB
            && format.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
    });
    let unorm = || {
        formats
            .iter()
            .find(|format| format.format == vk::Format::B8G8R8A8_UNORM)
    };
    srgb.or_else(unorm)
        .or_else(|| formats.first())
        .copied()
        .ok_or(VulkanError::SwapChainFormatsError)
}

pub fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let image_count = capabilities.min_image_count + 1;
    // max of zero means there is no maximum
    if capabilities.max_image_count > 0 && capabilities.max_image_count < image_count {
        capabilities.max_image_count
    } else {
        image_count
    }
}

pub struct SwapChainContainer {
    pub swap_chain_loader: khr::Swapchain,
    pub swap_chain: vk::SwapchainKHR,
    pub swap_chain_images: Vec<vk::Image>,
    pub swap_chain_format: vk::SurfaceFormatKHR,
    pub swap_chain_extent: vk::Extent2D,
}

impl SwapChainContainer {
    pub fn new(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        surface: &SurfaceContainer,
        window_size: &WindowSize,
        queue_indices: &QueueFamilyIndices,
    ) -> Result<Self> {
        let support = SwapChainSupportDetails::query_support(physical_device, surface)?;

        let surface_format = choose_swap_surface_format(&support.formats)?;
        let present_mode = choose_swap_present_mode(&support.present_modes);
        let extent = choose_swap_extent(&support.capabilities, window_size);
        let min_image_count = choose_image_count(&support.capabilities);

        let (sharing_mode, sharing_indices) = queue_indices.get_image_sharing_details();

        let swap_chain_create_info = vk::SwapchainCreateInfoKHR::builder()
            .surface(surface.surface)
            .min_image_count(min_image_count)
            .image_format(surface_format.format)
            .image_color_space(surface_format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(sharing_mode)
            .queue_family_indices(&sharing_indices)
            .pre_transform(support.capabilities.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true);

        let swap_chain_loader = khr::Swapchain::new(instance, logical_device);
        let swap_chain =
            unsafe { swap_chain_loader.create_swapchain(&swap_chain_create_info, None)? };
        let swap_chain_images = unsafe { swap_chain_loader.get_swapchain_images(swap_chain)? };

        info!(
            "Swap chain {}x{} {:?} with {} images",
            extent.width,
            extent.height,
            surface_format.format,
            swap_chain_images.len()
        );

        Ok(SwapChainContainer {
            swap_chain_loader,
            swap_chain,
            swap_chain_images,
            swap_chain_format: surface_format,
            swap_chain_extent: extent,
        })
    }

    pub unsafe fn cleanup(&mut self) {
        self.swap_chain_loader
            .destroy_swapchain(self.swap_chain, None);
        self.swap_chain_images.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_format(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space,
        }
    }

    fn capabilities(min: u32, max: u32, current: vk::Extent2D) -> vk::SurfaceCapabilitiesKHR {
        vk::SurfaceCapabilitiesKHR {
            min_image_count: min,
            max_image_count: max,
            current_extent: current,
            min_image_extent: vk::Extent2D {
                width: 16,
                height: 16,
            },
            max_image_extent: vk::Extent2D {
                width: 4096,
                height: 2048,
            },
            ..Default::default()
        }
    }

    #[test]
    fn srgb_format_is_preferred() {
        let formats = [
            surface_format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            surface_format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            surface_format(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        assert_eq!(
            choose_swap_surface_format(&formats).unwrap().format,
            vk::Format::B8G8R8A8_SRGB
        );
    }

    #[test]
    fn unorm_then_first_format_are_fallbacks() {
        let formats = [
            surface_format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            surface_format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        assert_eq!(
            choose_swap_surface_format(&formats).unwrap().format,
            vk::Format::B8G8R8A8_UNORM
        );
        assert_eq!(
            choose_swap_surface_format(&formats[..1]).unwrap().format,
            vk::Format::R8G8B8A8_UNORM
        );
        assert!(matches!(
            choose_swap_surface_format(&[]),
            Err(VulkanError::SwapChainFormatsError)
        ));
    }

    #[test]
    fn present_mode_is_fifo() {
        let modes = [vk::PresentModeKHR::MAILBOX, vk::PresentModeKHR::IMMEDIATE];
        assert_eq!(choose_swap_present_mode(&modes), vk::PresentModeKHR::FIFO);
    }

    #[test]
    fn current_extent_wins_when_defined() {
        let current = vk::Extent2D {
            width: 1600,
            height: 900,
        };
        let caps = capabilities(2, 3, current);
        let window = WindowSize {
            width: 10,
            height: 10,
        };
        assert_eq!(choose_swap_extent(&caps, &window), current);
    }

    #[test]
    fn undefined_extent_clamps_window_size() {
        let caps = capabilities(
            2,
            3,
            vk::Extent2D {
                width: u32::MAX,
                height: u32::MAX,
            },
        );
        let window = WindowSize {
            width: 8000,
            height: 4,
        };
        assert_eq!(
            choose_swap_extent(&caps, &window),
            vk::Extent2D {
                width: 4096,
                height: 16
            }
        );
        let window = WindowSize {
            width: 1600,
            height: 900,
        };
        assert_eq!(
            choose_swap_extent(&caps, &window),
            vk::Extent2D {
                width: 1600,
                height: 900
            }
        );
    }

    #[test]
    fn image_count_is_one_above_minimum_within_maximum() {
        let extent = vk::Extent2D::default();
        assert_eq!(choose_image_count(&capabilities(2, 8, extent)), 3);
        assert_eq!(choose_image_count(&capabilities(2, 2, extent)), 2);
        assert_eq!(choose_image_count(&capabilities(3, 0, extent)), 4);
    }
}
