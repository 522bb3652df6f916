use crate::buffers::{ConstantBuffer, VertexBuffer};
use crate::device::D3D11Device;
use crate::layout::vertex_stride;
use crate::pipeline::CubePipeline;
use crate::result::Result;
use crate::swapchain::SwapChain;
use crate::texture::CubeTexture;

use cube_common::{
    camera::{Camera, ClipSpace},
    config::{CubeConfig, CLEAR_COLOR, TEXTURE_PATH},
    rotation::CubeRotation,
    texture::FilesystemTextureSource,
    uniforms::UniformBufferObject,
};
use log::{debug, info};
use windows::Win32::{
    Foundation::HWND,
    Graphics::{
        Direct3D::D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST,
        Direct3D11::{D3D11_CLEAR_DEPTH, D3D11_VIEWPORT},
    },
};

pub struct D3D11Renderer {
    pipeline: CubePipeline,
    vertex_buffer: VertexBuffer,
    constant_buffer: ConstantBuffer,
    texture: CubeTexture,
    swap_chain: SwapChain,
    camera: Camera,
    // the device goes last
    device: D3D11Device,
}

impl D3D11Renderer {
    pub fn new(config: &CubeConfig, hwnd: HWND, width: u32, height: u32) -> Result<Self> {
        let device = D3D11Device::new()?;
        let swap_chain = SwapChain::new(&device, hwnd, width, height)?;
        let pipeline = CubePipeline::new(&device.device)?;
        let vertex_buffer = VertexBuffer::new(&device.device)?;
        let constant_buffer = ConstantBuffer::new(&device.device)?;
        let texture_source = FilesystemTextureSource::new(&config.resolve_resource(TEXTURE_PATH)?)?;
        let texture = CubeTexture::new(&texture_source, &device.device, &device.context)?;

        info!("Direct3D 11 renderer ready");
        Ok(Self {
            pipeline,
            vertex_buffer,
            constant_buffer,
            texture,
            swap_chain,
            camera: Camera::default(),
            device,
        })
    }

    /// Rebuilds the back buffers at the new size. A minimized window keeps the old buffers.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            debug!("Window minimized, keeping {}x{} buffers", self.swap_chain.width, self.swap_chain.height);
            return Ok(());
        }
        if width == self.swap_chain.width && height == self.swap_chain.height {
            return Ok(());
        }
        self.swap_chain.resize(&self.device, width, height)
    }

    /// Draws and presents one frame. Nothing happens while the window has no area.
    pub fn draw(&self, width: u32, height: u32, rotation: &CubeRotation) -> Result<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let (width, height) = (self.swap_chain.width, self.swap_chain.height);
        let ubo = match UniformBufferObject::for_frame(
            &self.camera,
            ClipSpace::Direct3D,
            rotation,
            width,
            height,
        ) {
            Some(ubo) => ubo,
            None => return Ok(()),
        };

        let context = &self.device.context;
        let views = self.swap_chain.views()?;
        self.constant_buffer.update(context, &ubo)?;

        let viewport = D3D11_VIEWPORT {
            TopLeftX: 0.0,
            TopLeftY: 0.0,
            Width: width as f32,
            Height: height as f32,
            MinDepth: 0.0,
            MaxDepth: 1.0,
        };
        let stride = vertex_stride();
        let offset = 0u32;

        unsafe {
            context.ClearRenderTargetView(&views.render_target_view, &CLEAR_COLOR);
            context.ClearDepthStencilView(&views.depth_stencil_view, D3D11_CLEAR_DEPTH.0 as u32, 1.0, 0);

            context.OMSetRenderTargets(
                Some(&[Some(views.render_target_view.clone())]),
                &views.depth_stencil_view,
            );
            context.OMSetDepthStencilState(&self.pipeline.depth_stencil_state, 0);
            context.RSSetState(&self.pipeline.rasterizer_state);
            context.RSSetViewports(Some(&[viewport]));

            context.IASetInputLayout(&self.pipeline.input_layout);
            context.IASetPrimitiveTopology(D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
            context.IASetVertexBuffers(
                0,
                1,
                Some(&Some(self.vertex_buffer.buffer.clone())),
                Some(&stride),
                Some(&offset),
            );

            context.VSSetShader(&self.pipeline.vertex_shader, None);
            context.VSSetConstantBuffers(0, Some(&[Some(self.constant_buffer.buffer.clone())]));
            context.PSSetShader(&self.pipeline.pixel_shader, None);
            context.PSSetShaderResources(0, Some(&[Some(self.texture.view.clone())]));
            context.PSSetSamplers(0, Some(&[Some(self.texture.sampler.clone())]));

            context.Draw(self.vertex_buffer.vertex_count, 0);
        }

        self.swap_chain.present()
    }
}
