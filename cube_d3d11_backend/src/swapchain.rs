use crate::device::D3D11Device;
use crate::result::{D3D11Error, Result};

use log::{debug, info};
use windows::Win32::{
    Foundation::{FALSE, HWND},
    Graphics::{
        Direct3D11::{
            ID3D11DepthStencilView, ID3D11Device, ID3D11RenderTargetView, ID3D11Texture2D,
            D3D11_BIND_DEPTH_STENCIL, D3D11_RENDER_TARGET_VIEW_DESC,
            D3D11_RENDER_TARGET_VIEW_DESC_0, D3D11_RTV_DIMENSION_TEXTURE2D, D3D11_TEX2D_RTV,
            D3D11_TEXTURE2D_DESC, D3D11_USAGE_DEFAULT,
        },
        Dxgi::{
            Common::{
                DXGI_ALPHA_MODE_IGNORE, DXGI_FORMAT_B8G8R8A8_UNORM,
                DXGI_FORMAT_B8G8R8A8_UNORM_SRGB, DXGI_FORMAT_D32_FLOAT, DXGI_FORMAT_UNKNOWN,
                DXGI_SAMPLE_DESC,
            },
            IDXGISwapChain1, DXGI_PRESENT, DXGI_SCALING_STRETCH, DXGI_SWAP_CHAIN_DESC1,
            DXGI_SWAP_CHAIN_FLAG, DXGI_SWAP_EFFECT_FLIP_DISCARD, DXGI_USAGE_RENDER_TARGET_OUTPUT,
        },
    },
};

const BUFFER_COUNT: u32 = 2;

/// The views that depend on the back buffer size. They have to go before `ResizeBuffers`.
pub struct TargetViews {
    pub render_target_view: ID3D11RenderTargetView,
    pub depth_stencil_view: ID3D11DepthStencilView,
}

pub struct SwapChain {
    swap_chain: IDXGISwapChain1,
    views: Option<TargetViews>,
    pub width: u32,
    pub height: u32,
}

impl SwapChain {
    pub fn new(device: &D3D11Device, hwnd: HWND, width: u32, height: u32) -> Result<Self> {
        let desc = DXGI_SWAP_CHAIN_DESC1 {
            Width: width,
            Height: height,
            // flip model swapchains cannot be sRGB themselves, the render target view is
            Format: DXGI_FORMAT_B8G8R8A8_UNORM,
            Stereo: FALSE,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: BUFFER_COUNT,
            Scaling: DXGI_SCALING_STRETCH,
            SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
            AlphaMode: DXGI_ALPHA_MODE_IGNORE,
            Flags: 0,
        };
        let swap_chain = unsafe {
            device
                .factory
                .CreateSwapChainForHwnd(&device.device, hwnd, &desc, None, None)?
        };
        info!(
            "Created flip discard swapchain {}x{} with {} buffers",
            width, height, BUFFER_COUNT
        );

        let views = create_target_views(&device.device, &swap_chain, width, height)?;
        Ok(Self {
            swap_chain,
            views: Some(views),
            width,
            height,
        })
    }

    pub fn views(&self) -> Result<&TargetViews> {
        self.views
            .as_ref()
            .ok_or(D3D11Error::MissingObject("render target views"))
    }

    /// Releases the views, resizes the buffers and builds the views again at the new size.
    pub fn resize(&mut self, device: &D3D11Device, width: u32, height: u32) -> Result<()> {
        debug!("Resizing swapchain buffers to {}x{}", width, height);
        unsafe {
            // the context holds references to the bound views too
            device.context.ClearState();
        }
        self.views = None;
        unsafe {
            self.swap_chain.ResizeBuffers(
                0,
                width,
                height,
                DXGI_FORMAT_UNKNOWN,
                DXGI_SWAP_CHAIN_FLAG(0),
            )?;
        }
        self.views = Some(create_target_views(
            &device.device,
            &self.swap_chain,
            width,
            height,
        )?);
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Presents with vsync.
    pub fn present(&self) -> Result<()> {
        unsafe { self.swap_chain.Present(1, DXGI_PRESENT(0)).ok()? };
        Ok(())
    }
}

fn create_target_views(
    device: &ID3D11Device,
    swap_chain: &IDXGISwapChain1,
    width: u32,
    height: u32,
) -> Result<TargetViews> {
    let back_buffer: ID3D11Texture2D = unsafe { swap_chain.GetBuffer(0)? };
    let rtv_desc = D3D11_RENDER_TARGET_VIEW_DESC {
        Format: DXGI_FORMAT_B8G8R8A8_UNORM_SRGB,
        ViewDimension: D3D11_RTV_DIMENSION_TEXTURE2D,
        Anonymous: D3D11_RENDER_TARGET_VIEW_DESC_0 {
            Texture2D: D3D11_TEX2D_RTV { MipSlice: 0 },
        },
    };
    let mut render_target_view = None;
    unsafe {
        device.CreateRenderTargetView(&back_buffer, Some(&rtv_desc), Some(&mut render_target_view))?
    };

    let depth_desc = D3D11_TEXTURE2D_DESC {
        Width: width,
        Height: height,
        MipLevels: 1,
        ArraySize: 1,
        Format: DXGI_FORMAT_D32_FLOAT,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Usage: D3D11_USAGE_DEFAULT,
        BindFlags: D3D11_BIND_DEPTH_STENCIL.0 as u32,
        CPUAccessFlags: 0,
        MiscFlags: 0,
    };
    let mut depth_texture: Option<ID3D11Texture2D> = None;
    unsafe { device.CreateTexture2D(&depth_desc, None, Some(&mut depth_texture))? };
    let depth_texture = depth_texture.ok_or(D3D11Error::MissingObject("depth texture"))?;

    // the view keeps the texture alive
    let mut depth_stencil_view = None;
    unsafe { device.CreateDepthStencilView(&depth_texture, None, Some(&mut depth_stencil_view))? };

    Ok(TargetViews {
        render_target_view: render_target_view
            .ok_or(D3D11Error::MissingObject("render target view"))?,
        depth_stencil_view: depth_stencil_view
            .ok_or(D3D11Error::MissingObject("depth stencil view"))?,
    })
}
