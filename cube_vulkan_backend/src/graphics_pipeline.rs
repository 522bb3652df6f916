pub mod render_pass;
pub mod shader_module;

use crate::buffers::vertex_buffer::VertexBuffer;
use crate::graphics_pipeline::render_pass::create_render_pass;
use crate::graphics_pipeline::shader_module::create_shader_module;
use crate::presentation::swap_chain::SwapChainContainer;
use crate::util::result::{Result, VulkanError};

use ash::version::DeviceV1_0;
use ash::vk;
use cube_common::config::{
    CubeConfig, CLEAR_COLOR, FRAGMENT_SHADER_SPV_PATH, VERTEX_SHADER_SPV_PATH,
};
use std::convert::TryFrom;
use std::ffi::CString;
use std::path::PathBuf;
//////////////////////// Structs ///////////////////////
/// Locations of the compiled SPIR-V, resolved once at startup.
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

pub struct GraphicsPipeline {
    pub render_pass: vk::RenderPass,
    pub pipeline_layout: vk::PipelineLayout,
    pub pipeline: vk::Pipeline,
}
//////////////////////// Impls ///////////////////////
impl ShaderPaths {
    pub fn resolve(config: &CubeConfig) -> Result<Self> {
        Ok(Self {
            vertex: config.resolve_resource(VERTEX_SHADER_SPV_PATH)?,
            fragment: config.resolve_resource(FRAGMENT_SHADER_SPV_PATH)?,
        })
    }
}

impl GraphicsPipeline {
    /// Color clear for attachment 0 and depth clear (far plane) for attachment 1.
    pub fn clear_values() -> [vk::ClearValue; 2] {
        [
            vk::ClearValue {
                color: vk::ClearColorValue {
                    float32: CLEAR_COLOR,
                },
            },
            vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue {
                    depth: 1.0,
                    stencil: 0,
                },
            },
        ]
    }

    pub fn new(
        logical_device: &ash::Device,
        swap_chain_container: &SwapChainContainer,
        depth_format: vk::Format,
        descriptor_set_layout: vk::DescriptorSetLayout,
        shader_paths: &ShaderPaths,
    ) -> Result<Self> {
        let vert_shader = create_shader_module(&shader_paths.vertex, logical_device)?;
        let frag_shader = match create_shader_module(&shader_paths.fragment, logical_device) {
            Ok(module) => module,
            Err(error) => {
                unsafe { logical_device.destroy_shader_module(vert_shader, None) };
                return Err(error);
            }
        };

        let result = Self::create_with_modules(
            logical_device,
            swap_chain_container,
            depth_format,
            descriptor_set_layout,
            vert_shader,
            frag_shader,
        );

        // modules are only needed while the pipeline is being created
        unsafe {
            logical_device.destroy_shader_module(vert_shader, None);
            logical_device.destroy_shader_module(frag_shader, None);
        }

        result
    }

    fn create_with_modules(
        logical_device: &ash::Device,
        swap_chain_container: &SwapChainContainer,
        depth_format: vk::Format,
        descriptor_set_layout: vk::DescriptorSetLayout,
        vert_shader: vk::ShaderModule,
        frag_shader: vk::ShaderModule,
    ) -> Result<Self> {
        let main_function = CString::new("main")?;
        ////////////////////////////
        // PROGRAMABLE stages
        ////////////////////////////
        let pipeline_stages = [
            vk::PipelineShaderStageCreateInfo {
                stage: vk::ShaderStageFlags::VERTEX,
                module: vert_shader,
                p_name: main_function.as_ptr(),
                ..Default::default()
            },
            vk::PipelineShaderStageCreateInfo {
                stage: vk::ShaderStageFlags::FRAGMENT,
                module: frag_shader,
                p_name: main_function.as_ptr(),
                ..Default::default()
            },
        ];

        ////////////////////////////
        // FIXED FUNCTION stages
        ////////////////////////////
        let vertex_input_binding = VertexBuffer::get_binding_description();
        let vertex_input_attributes = VertexBuffer::get_attribute_descriptions();

        let vertex_input_create_info = vk::PipelineVertexInputStateCreateInfo {
            vertex_binding_description_count: 1,
            p_vertex_binding_descriptions: &vertex_input_binding,
            vertex_attribute_description_count: u32::try_from(vertex_input_attributes.len())?,
            p_vertex_attribute_descriptions: vertex_input_attributes.as_ptr(),
            ..Default::default()
        };

        let input_assembly_create_info = vk::PipelineInputAssemblyStateCreateInfo {
            topology: vk::PrimitiveTopology::TRIANGLE_LIST,
            primitive_restart_enable: vk::FALSE,
            ..Default::default()
        };

        let extent = swap_chain_container.swap_chain_extent;
        let viewport = vk::Viewport {
            x: 0.0f32,
            y: 0.0f32,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0f32,
            max_depth: 1.0f32,
        };

        let scissor = vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        };

        let viewport_create_info = vk::PipelineViewportStateCreateInfo {
            viewport_count: 1,
            p_viewports: &viewport,
            scissor_count: 1,
            p_scissors: &scissor,
            ..Default::default()
        };

        let rasterization_create_info = vk::PipelineRasterizationStateCreateInfo {
            depth_clamp_enable: vk::FALSE,
            rasterizer_discard_enable: vk::FALSE,
            polygon_mode: vk::PolygonMode::FILL,
            line_width: 1.0f32,
            cull_mode: vk::CullModeFlags::BACK,
            // the projection flips y, which keeps the mesh's counter clockwise faces counter clockwise
            // in framebuffer coordinates
            front_face: vk::FrontFace::COUNTER_CLOCKWISE,
            depth_bias_enable: vk::FALSE,
            ..Default::default()
        };

        let multisampling_create_info = vk::PipelineMultisampleStateCreateInfo {
            sample_shading_enable: vk::FALSE,
            rasterization_samples: vk::SampleCountFlags::TYPE_1,
            ..Default::default()
        };

        let depth_stencil_create_info = vk::PipelineDepthStencilStateCreateInfo {
            depth_test_enable: vk::TRUE,
            depth_write_enable: vk::TRUE,
            depth_compare_op: vk::CompareOp::LESS,
            depth_bounds_test_enable: vk::FALSE,
            min_depth_bounds: 0.0f32,
            max_depth_bounds: 1.0f32,
            stencil_test_enable: vk::FALSE,
            ..Default::default()
        };

        let color_blend_attachment_state = vk::PipelineColorBlendAttachmentState {
            color_write_mask: vk::ColorComponentFlags::all(),
            blend_enable: vk::FALSE,
            ..Default::default()
        };

        let color_blending_create_info = vk::PipelineColorBlendStateCreateInfo {
            logic_op_enable: vk::FALSE,
            attachment_count: 1,
            p_attachments: &color_blend_attachment_state,
            ..Default::default()
        };

        let set_layouts = [descriptor_set_layout];
        let pipeline_layout_create_info = vk::PipelineLayoutCreateInfo {
            set_layout_count: u32::try_from(set_layouts.len())?,
            p_set_layouts: set_layouts.as_ptr(),
            ..Default::default()
        };

        let render_pass = create_render_pass(logical_device, swap_chain_container, depth_format)?;

        let pipeline_layout =
            match unsafe { logical_device.create_pipeline_layout(&pipeline_layout_create_info, None) } {
                Ok(layout) => layout,
                Err(error) => {
                    unsafe { logical_device.destroy_render_pass(render_pass, None) };
                    return Err(VulkanError::from(error));
                }
            };

        let pipeline_create_info = vk::GraphicsPipelineCreateInfo {
            stage_count: u32::try_from(pipeline_stages.len())?,
            p_stages: pipeline_stages.as_ptr(),
            p_vertex_input_state: &vertex_input_create_info,
            p_input_assembly_state: &input_assembly_create_info,
            p_viewport_state: &viewport_create_info,
            p_rasterization_state: &rasterization_create_info,
            p_multisample_state: &multisampling_create_info,
            p_depth_stencil_state: &depth_stencil_create_info,
            p_color_blend_state: &color_blending_create_info,
            layout: pipeline_layout,
            render_pass,
            subpass: 0,
            base_pipeline_handle: vk::Pipeline::null(),
            base_pipeline_index: -1,
            ..Default::default()
        };

        let graphics_pipeline_result = unsafe {
            logical_device.create_graphics_pipelines(
                vk::PipelineCache::null(),
                &[pipeline_create_info],
                None,
            )
        };

        let pipeline = match graphics_pipeline_result {
            Ok(pipelines) => pipelines.first().copied(),
            Err((_, result)) => {
                log::error!("Graphics pipeline creation returned {}", result);
                None
            }
        };

        match pipeline {
            Some(pipeline) => Ok(Self {
                render_pass,
                pipeline_layout,
                pipeline,
            }),
            None => {
                unsafe {
                    logical_device.destroy_pipeline_layout(pipeline_layout, None);
                    logical_device.destroy_render_pass(render_pass, None);
                }
                Err(VulkanError::PipelineCreateError)
            }
        }
    }

    pub unsafe fn cleanup(&self, logical_device: &ash::Device) {
        logical_device.destroy_pipeline(self.pipeline, None);
        logical_device.destroy_pipeline_layout(self.pipeline_layout, None);
        logical_device.destroy_render_pass(self.render_pass, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_values_use_background_color_and_far_depth() {
        let clear_values = GraphicsPipeline::clear_values();
        unsafe {
            assert_eq!(clear_values[0].color.float32, CLEAR_COLOR);
            assert_eq!(clear_values[1].depth_stencil.depth, 1.0);
            assert_eq!(clear_values[1].depth_stencil.stencil, 0);
        }
    }
}
