use crate::presentation::swap_chain::SwapChainContainer;
use crate::textures::images::create_image_view;
use crate::util::result::Result;

use ash::version::DeviceV1_0;
use ash::vk;
//////////////////////// Structs ///////////////////////
pub struct ImageViews {
    pub image_views: Vec<vk::ImageView>,
}
//////////////////////// Impls ///////////////////////
impl ImageViews {
    pub fn new(
        logical_device: &ash::Device,
        swap_chain_container: &SwapChainContainer,
    ) -> Result<Self> {
        let image_views = swap_chain_container
            .swap_chain_images
            .iter()
            .map(|&image| {
                create_image_view(
                    image,
                    swap_chain_container.swap_chain_format.format,
                    vk::ImageAspectFlags::COLOR,
                    1,
                    logical_device,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ImageViews { image_views })
    }

    pub unsafe fn cleanup(&mut self, logical_device: &ash::Device) {
        for image_view in self.image_views.drain(..) {
            logical_device.destroy_image_view(image_view, None);
        }
    }
}
