use crate::{
    graphics_pipeline::GraphicsPipeline,
    presentation::{image_views::ImageViews, swap_chain::SwapChainContainer},
    util::result::Result,
};
use ash::{version::DeviceV1_0, vk};

pub fn create_framebuffers(
    logical_device: &ash::Device,
    graphics_pipeline: &GraphicsPipeline,
    image_views: &ImageViews,
    depth_image_view: vk::ImageView,
    swap_chain_container: &SwapChainContainer,
) -> Result<Vec<vk::Framebuffer>> {
    let mut framebuffers = Vec::with_capacity(image_views.image_views.len());
    for &image_view in image_views.image_views.iter() {
        // every swap chain image gets its own color attachment but they all share one depth image,
        // only one subpass touches it at a time
        let attachments = [image_view, depth_image_view];

        let framebuffer_create_info = vk::FramebufferCreateInfo::builder()
            .render_pass(graphics_pipeline.render_pass)
            .attachments(&attachments)
            .width(swap_chain_container.swap_chain_extent.width)
            .height(swap_chain_container.swap_chain_extent.height)
            .layers(1);

        let framebuffer =
            unsafe { logical_device.create_framebuffer(&framebuffer_create_info, None)? };
        framebuffers.push(framebuffer);
    }
    Ok(framebuffers)
}
