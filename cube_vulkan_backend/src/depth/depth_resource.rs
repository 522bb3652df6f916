use crate::{
    presentation::swap_chain::SwapChainContainer,
    textures::images::{create_image_view, Image, MipmapParam},
    util::result::Result,
};
use ash::{version::DeviceV1_0, vk};

/// Depth attachment sized to the swap chain. Rebuilt whenever the swap chain is.
pub struct DepthResource {
    pub depth_image: Image,
    pub depth_image_view: vk::ImageView,
}

impl DepthResource {
    pub fn new(
        depth_format: vk::Format,
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        swap_chain_container: &SwapChainContainer,
    ) -> Result<Self> {
        let depth_image = Image::new(
            swap_chain_container.swap_chain_extent.width,
            swap_chain_container.swap_chain_extent.height,
            MipmapParam::NoMipmap,
            depth_format,
            vk::ImageTiling::OPTIMAL,
            vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
            instance,
            physical_device,
            logical_device,
        )?;

        // the render pass moves the image out of UNDEFINED so no explicit transition is recorded here
        let depth_image_view = match create_image_view(
            depth_image.image,
            depth_format,
            vk::ImageAspectFlags::DEPTH,
            1,
            logical_device,
        ) {
            Ok(view) => view,
            Err(error) => {
                unsafe { depth_image.cleanup(logical_device) };
                return Err(error);
            }
        };

        Ok(DepthResource {
            depth_image,
            depth_image_view,
        })
    }

    pub unsafe fn cleanup(self, logical_device: &ash::Device) {
        logical_device.destroy_image_view(self.depth_image_view, None);
        self.depth_image.cleanup(logical_device);
    }
}
