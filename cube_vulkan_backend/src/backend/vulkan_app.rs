use crate::{
    buffers::vertex_buffer::VertexBuffer,
    depth::{
        depth_resource::DepthResource,
        helpers::{find_depth_format, has_stencil_component},
    },
    devices::{
        logical_device::create_logical_device,
        physical_device::pick_physical_device,
        queues::{create_queues, QueueFamilyIndices, Queues},
        requirements::DeviceRequirements,
    },
    drawing::{command_buffers, framebuffers, synchronization::SynchronizationContainer},
    graphics_pipeline::{GraphicsPipeline, ShaderPaths},
    presentation::{image_views::ImageViews, swap_chain::SwapChainContainer},
    textures::images::TextureImage,
    uniforms::{
        buffers::UniformBuffers,
        descriptors::{create_descriptor_set_layout, DescriptorData},
    },
    util::{
        debug::VulkanDebug,
        platform::{self, SurfaceContainer},
        result::{Result, VulkanError},
        validation::VulkanValidation,
    },
    window::{WindowSize, WindowSurface},
};
use ash::{
    version::{DeviceV1_0, EntryV1_0, InstanceV1_0},
    vk,
};
use cube_common::{
    camera::{Camera, ClipSpace},
    config::{CubeConfig, TEXTURE_PATH},
    mesh::CUBE_VERTICES,
    rotation::CubeRotation,
    texture::FilesystemTextureSource,
    uniforms::UniformBufferObject,
};
use log::{debug, info, warn};
use std::{convert::TryFrom, ffi::CString, os::raw::c_void, ptr};

const ENGINE_NAME: &str = "cube";

/// Where in the frame a swap chain status was reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStage {
    Acquire,
    Present,
}

/// Decides whether the swap chain has to be rebuilt after acquire or present.
///
/// `result` is what ash returns for the call: `Ok(suboptimal)` or the error code.
/// Acquire only gives up on `OUT_OF_DATE`, a suboptimal image is still drawn and presented.
/// After present, `OUT_OF_DATE`, `SUBOPTIMAL` and a pending window resize all cause a rebuild.
/// Any other error is returned.
pub fn needs_recreation(
    stage: FrameStage,
    result: std::result::Result<bool, vk::Result>,
    window_resized: bool,
) -> Result<bool> {
    match (stage, result) {
        (_, Err(vk::Result::ERROR_OUT_OF_DATE_KHR)) => Ok(true),
        (FrameStage::Present, Err(vk::Result::SUBOPTIMAL_KHR)) => Ok(true),
        (_, Err(error)) => Err(VulkanError::from(error)),
        (FrameStage::Acquire, Ok(_)) => Ok(false),
        (FrameStage::Present, Ok(suboptimal)) => Ok(suboptimal || window_resized),
    }
}

/// Everything that has to be destroyed and rebuilt together with the swap chain.
struct SwapChainDependentFields {
    swap_chain_container: SwapChainContainer,
    image_views: ImageViews,
    depth_resource: DepthResource,
    graphics_pipeline: GraphicsPipeline,
    framebuffers: Vec<vk::Framebuffer>,
    uniform_buffers: UniformBuffers,
    descriptor_data: DescriptorData,
    command_buffers: Vec<vk::CommandBuffer>,
}

pub struct VulkanApp {
    _entry: ash::Entry,
    instance: ash::Instance,
    _validation: VulkanValidation,
    debug: VulkanDebug,
    surface_container: SurfaceContainer,
    physical_device: vk::PhysicalDevice,
    logical_device: ash::Device,
    queue_indices: QueueFamilyIndices,
    queues: Queues,
    command_pool: vk::CommandPool,
    descriptor_set_layout: vk::DescriptorSetLayout,
    depth_format: vk::Format,
    shader_paths: ShaderPaths,
    vertex_buffer: Option<VertexBuffer>,
    texture_image: Option<TextureImage>,
    dependent_fields: Option<SwapChainDependentFields>,
    sync_container: SynchronizationContainer,
    camera: Camera,
    /// Set by the window event handler. Handled after the next present.
    pub window_resized: bool,
}

impl VulkanApp {
    pub fn new(
        window_title: &str,
        window_surface: &WindowSurface,
        window_size: &WindowSize,
        config: &CubeConfig,
    ) -> Result<Self> {
        let entry = unsafe { ash::Entry::new()? };
        let validation = VulkanValidation::for_build();
        let instance = Self::create_instance(window_title, &entry, &validation)?;
        let debug = VulkanDebug::new(&entry, &instance, &validation)?;
        let surface_container = platform::create_surface(&entry, &instance, window_surface)?;

        let requirements = DeviceRequirements::for_cube();
        let physical_device = pick_physical_device(&instance, &surface_container, &requirements)?;
        let queue_indices = QueueFamilyIndices::find(&instance, physical_device, &surface_container)?;
        let logical_device = create_logical_device(
            &instance,
            physical_device,
            &queue_indices,
            &requirements,
            &validation,
        )?;
        let queues = create_queues(&queue_indices, &logical_device);

        let command_pool = command_buffers::create_command_pool(&logical_device, &queue_indices)?;
        let descriptor_set_layout = create_descriptor_set_layout(&logical_device)?;
        let sync_container = SynchronizationContainer::create(&logical_device)?;

        let depth_format = find_depth_format(&instance, physical_device)?;
        debug!(
            "Depth format {:?} (stencil: {})",
            depth_format,
            has_stencil_component(depth_format)
        );
        let shader_paths = ShaderPaths::resolve(config)?;

        let mut app = Self {
            _entry: entry,
            instance,
            _validation: validation,
            debug,
            surface_container,
            physical_device,
            logical_device,
            queue_indices,
            queues,
            command_pool,
            descriptor_set_layout,
            depth_format,
            shader_paths,
            vertex_buffer: None,
            texture_image: None,
            dependent_fields: None,
            sync_container,
            camera: Camera::default(),
            window_resized: false,
        };

        // from here on Drop releases whatever was created if a later step fails
        app.load_cube(config)?;
        if !window_size.is_minimized() {
            app.dependent_fields = Some(app.create_swapchain_dependent_fields(window_size)?);
        }

        Ok(app)
    }

    fn create_instance(
        window_title: &str,
        entry: &ash::Entry,
        validation: &VulkanValidation,
    ) -> Result<ash::Instance> {
        validation.check_validation_layer_support(entry)?;

        let app_name = CString::new(window_title)?;
        let engine_name = CString::new(ENGINE_NAME)?;
        let app_info = vk::ApplicationInfo {
            p_application_name: app_name.as_ptr(),
            application_version: vk::make_version(1, 0, 0),
            p_engine_name: engine_name.as_ptr(),
            engine_version: vk::make_version(1, 0, 0),
            api_version: vk::make_version(1, 0, 0),
            ..Default::default()
        };

        let extension_names = platform::required_extension_names(validation.is_enabled);

        // has to outlive create_instance since it is only referenced through p_next
        let debug_create_info = VulkanDebug::instance_debug_create_info(validation);
        let p_next = debug_create_info
            .as_ref()
            .map_or(ptr::null(), |info| {
                info as *const vk::DebugUtilsMessengerCreateInfoEXT as *const c_void
            });

        let create_info = vk::InstanceCreateInfo {
            p_next,
            p_application_info: &app_info,
            enabled_layer_count: validation.get_enabled_layer_count(),
            pp_enabled_layer_names: validation.get_enabled_layer_names(),
            enabled_extension_count: u32::try_from(extension_names.len())?,
            pp_enabled_extension_names: extension_names.as_ptr(),
            ..Default::default()
        };

        let instance = unsafe { entry.create_instance(&create_info, None)? };
        info!("Created Vulkan instance (validation: {})", validation.is_enabled);

        Ok(instance)
    }

    /// Uploads the vertices and the texture. Neither depends on the swap chain.
    fn load_cube(&mut self, config: &CubeConfig) -> Result<()> {
        self.vertex_buffer = Some(VertexBuffer::new(
            &CUBE_VERTICES,
            &self.instance,
            self.physical_device,
            &self.logical_device,
            self.command_pool,
            self.queues.graphics_queue,
        )?);

        let texture_path = config.resolve_resource(TEXTURE_PATH)?;
        let texture_source = FilesystemTextureSource::new(&texture_path)?;
        self.texture_image = Some(TextureImage::new(
            &texture_source,
            &self.instance,
            self.physical_device,
            &self.logical_device,
            self.command_pool,
            self.queues.graphics_queue,
        )?);

        Ok(())
    }

    fn create_swapchain_dependent_fields(
        &self,
        window_size: &WindowSize,
    ) -> Result<SwapChainDependentFields> {
        let (vertex_buffer, texture_image) = match (&self.vertex_buffer, &self.texture_image) {
            (Some(vertex_buffer), Some(texture_image)) => (vertex_buffer, texture_image),
            _ => return Err(VulkanError::CubeNotLoaded),
        };

        let swap_chain_container = SwapChainContainer::new(
            &self.instance,
            self.physical_device,
            &self.logical_device,
            &self.surface_container,
            window_size,
            &self.queue_indices,
        )?;
        let image_views = ImageViews::new(&self.logical_device, &swap_chain_container)?;
        let depth_resource = DepthResource::new(
            self.depth_format,
            &self.instance,
            self.physical_device,
            &self.logical_device,
            &swap_chain_container,
        )?;
        let graphics_pipeline = GraphicsPipeline::new(
            &self.logical_device,
            &swap_chain_container,
            self.depth_format,
            self.descriptor_set_layout,
            &self.shader_paths,
        )?;
        let framebuffers = framebuffers::create_framebuffers(
            &self.logical_device,
            &graphics_pipeline,
            &image_views,
            depth_resource.depth_image_view,
            &swap_chain_container,
        )?;
        let uniform_buffers = UniformBuffers::new(
            &self.instance,
            self.physical_device,
            &self.logical_device,
            &swap_chain_container,
        )?;
        let descriptor_data = DescriptorData::new(
            &self.logical_device,
            &swap_chain_container,
            self.descriptor_set_layout,
            &uniform_buffers,
            texture_image,
        )?;
        let command_buffers = command_buffers::create_command_buffers(
            &self.logical_device,
            self.command_pool,
            &framebuffers,
            &graphics_pipeline,
            &swap_chain_container,
            vertex_buffer,
            &descriptor_data,
        )?;

        Ok(SwapChainDependentFields {
            swap_chain_container,
            image_views,
            depth_resource,
            graphics_pipeline,
            framebuffers,
            uniform_buffers,
            descriptor_data,
            command_buffers,
        })
    }

    /// Rebuilds everything sized by the swap chain. A minimized window keeps the resize pending
    /// since a swap chain without area cannot be created.
    pub fn recreate_swap_chain(&mut self, window_size: &WindowSize) -> Result<()> {
        if window_size.is_minimized() {
            self.window_resized = true;
            return Ok(());
        }
        info!(
            "Recreating swap chain for {}x{}",
            window_size.width, window_size.height
        );

        unsafe {
            self.logical_device.device_wait_idle()?;
            self.cleanup_swap_chain();
        }
        self.window_resized = false;
        self.sync_container.forget_images();
        self.dependent_fields = Some(self.create_swapchain_dependent_fields(window_size)?);

        Ok(())
    }

    /// Renders and presents one frame with the cube at `rotation`.
    pub fn draw_frame(&mut self, window_size: &WindowSize, rotation: &CubeRotation) -> Result<()> {
        if window_size.is_minimized() {
            return Ok(());
        }
        if self.dependent_fields.is_none() {
            // restored from a minimized start, or a recreation that was deferred
            return self.recreate_swap_chain(window_size);
        }

        let cpu_gpu_fence = self.sync_container.get_in_flight_fence();
        unsafe {
            self.logical_device
                .wait_for_fences(&[cpu_gpu_fence], true, u64::MAX)?;
        }

        let acquire_result = match &self.dependent_fields {
            Some(fields) => unsafe {
                fields.swap_chain_container.swap_chain_loader.acquire_next_image(
                    fields.swap_chain_container.swap_chain,
                    u64::MAX,
                    self.sync_container.get_image_available_semaphore(),
                    vk::Fence::null(),
                )
            },
            None => return Ok(()),
        };
        if needs_recreation(
            FrameStage::Acquire,
            acquire_result.map(|(_, suboptimal)| suboptimal),
            self.window_resized,
        )? {
            return self.recreate_swap_chain(window_size);
        }
        let (image_index, _) = acquire_result?;

        // acquire may hand out an image that an older frame is still rendering to
        if let Some(image_fence) = self.sync_container.claim_image(image_index) {
            unsafe {
                self.logical_device
                    .wait_for_fences(&[image_fence], true, u64::MAX)?;
            }
        }

        let fields = match &self.dependent_fields {
            Some(fields) => fields,
            None => return Ok(()),
        };
        let image_idx = usize::try_from(image_index)?;
        let extent = fields.swap_chain_container.swap_chain_extent;
        let ubo = UniformBufferObject::for_frame(
            &self.camera,
            ClipSpace::Vulkan,
            rotation,
            extent.width,
            extent.height,
        );
        if let Some(ubo) = ubo {
            fields
                .uniform_buffers
                .update(&self.logical_device, image_idx, &ubo)?;
        }

        let command_buffer = *fields
            .command_buffers
            .get(image_idx)
            .ok_or(VulkanError::CommandBufferNotAvailable(image_idx))?;

        let wait_semaphores = [self.sync_container.get_image_available_semaphore()];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let signal_semaphores = [self.sync_container.get_render_finished_semaphore()];
        let submitted_command_buffers = [command_buffer];

        let submit_infos = [vk::SubmitInfo::builder()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&submitted_command_buffers)
            .signal_semaphores(&signal_semaphores)
            .build()];

        unsafe {
            self.logical_device.reset_fences(&[cpu_gpu_fence])?;
            self.logical_device
                .queue_submit(self.queues.graphics_queue, &submit_infos, cpu_gpu_fence)?;
        }

        let swap_chains = [fields.swap_chain_container.swap_chain];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(&signal_semaphores)
            .swapchains(&swap_chains)
            .image_indices(&image_indices);

        let present_result = unsafe {
            fields
                .swap_chain_container
                .swap_chain_loader
                .queue_present(self.queues.present_queue, &present_info)
        };

        if needs_recreation(FrameStage::Present, present_result, self.window_resized)? {
            self.recreate_swap_chain(window_size)?;
        }

        self.sync_container.update_frame_counter();

        Ok(())
    }

    pub fn wait_until_device_idle(&self) -> Result<()> {
        unsafe {
            self.logical_device.device_wait_idle()?;
        }
        Ok(())
    }

    /// # Safety
    ///
    /// The device must be idle.
    unsafe fn cleanup_swap_chain(&mut self) {
        if let Some(mut fields) = self.dependent_fields.take() {
            self.logical_device
                .free_command_buffers(self.command_pool, &fields.command_buffers);
            // descriptor sets go with their pool
            fields.descriptor_data.cleanup(&self.logical_device);
            fields.uniform_buffers.cleanup(&self.logical_device);
            for &framebuffer in fields.framebuffers.iter() {
                self.logical_device.destroy_framebuffer(framebuffer, None);
            }
            fields.graphics_pipeline.cleanup(&self.logical_device);
            fields.depth_resource.cleanup(&self.logical_device);
            fields.image_views.cleanup(&self.logical_device);
            fields.swap_chain_container.cleanup();
        }
    }
}

impl Drop for VulkanApp {
    fn drop(&mut self) {
        info!("VulkanApp exiting");
        unsafe {
            if let Err(error) = self.logical_device.device_wait_idle() {
                warn!("Device wait idle failed during teardown: {}", error);
            }
            self.cleanup_swap_chain();

            if let Some(texture_image) = self.texture_image.take() {
                texture_image.cleanup(&self.logical_device);
            }
            if let Some(vertex_buffer) = self.vertex_buffer.take() {
                vertex_buffer.cleanup(&self.logical_device);
            }

            self.logical_device
                .destroy_descriptor_set_layout(self.descriptor_set_layout, None);
            self.sync_container.destroy(&self.logical_device);
            self.logical_device
                .destroy_command_pool(self.command_pool, None);

            self.logical_device.destroy_device(None);
            self.surface_container.destroy();
            self.debug.destroy_debug_messenger();
            self.instance.destroy_instance(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_date_on_acquire_recreates() {
        assert!(needs_recreation(
            FrameStage::Acquire,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR),
            false
        )
        .unwrap());
    }

    #[test]
    fn suboptimal_acquire_still_draws() {
        assert!(!needs_recreation(FrameStage::Acquire, Ok(true), false).unwrap());
        // a pending resize waits until after present
        assert!(!needs_recreation(FrameStage::Acquire, Ok(false), true).unwrap());
    }

    #[test]
    fn present_recreates_on_out_of_date_suboptimal_or_resize() {
        assert!(needs_recreation(
            FrameStage::Present,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR),
            false
        )
        .unwrap());
        assert!(needs_recreation(FrameStage::Present, Err(vk::Result::SUBOPTIMAL_KHR), false).unwrap());
        assert!(needs_recreation(FrameStage::Present, Ok(true), false).unwrap());
        assert!(needs_recreation(FrameStage::Present, Ok(false), true).unwrap());
        assert!(!needs_recreation(FrameStage::Present, Ok(false), false).unwrap());
    }

    #[test]
    fn other_errors_are_returned() {
        for stage in [FrameStage::Acquire, FrameStage::Present].iter() {
            match needs_recreation(*stage, Err(vk::Result::ERROR_DEVICE_LOST), true) {
                Err(VulkanError::OtherVkResult(vk::Result::ERROR_DEVICE_LOST)) => {}
                other => panic!("unexpected {:?}", other.map_err(|e| e.to_string())),
            }
        }
    }
}
