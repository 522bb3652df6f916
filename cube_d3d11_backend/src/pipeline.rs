use crate::layout::input_element_descs;
use crate::result::{D3D11Error, Result};
use crate::shaders::{blob_bytes, compile_shader, ShaderStage};

use windows::Win32::{
    Foundation::{FALSE, TRUE},
    Graphics::Direct3D11::{
        ID3D11DepthStencilState, ID3D11Device, ID3D11InputLayout, ID3D11PixelShader,
        ID3D11RasterizerState, ID3D11VertexShader, D3D11_COMPARISON_LESS, D3D11_CULL_BACK,
        D3D11_DEPTH_STENCIL_DESC, D3D11_DEPTH_WRITE_MASK_ALL, D3D11_FILL_SOLID,
        D3D11_RASTERIZER_DESC,
    },
};

/// Everything bound per draw that is not a resource.
pub struct CubePipeline {
    pub vertex_shader: ID3D11VertexShader,
    pub pixel_shader: ID3D11PixelShader,
    pub input_layout: ID3D11InputLayout,
    pub rasterizer_state: ID3D11RasterizerState,
    pub depth_stencil_state: ID3D11DepthStencilState,
}

impl CubePipeline {
    pub fn new(device: &ID3D11Device) -> Result<Self> {
        let vertex_blob = compile_shader(ShaderStage::Vertex)?;
        let pixel_blob = compile_shader(ShaderStage::Pixel)?;
        let vertex_bytecode = blob_bytes(&vertex_blob);

        let mut vertex_shader = None;
        let mut pixel_shader = None;
        let mut input_layout = None;
        unsafe {
            device.CreateVertexShader(vertex_bytecode, None, Some(&mut vertex_shader))?;
            device.CreatePixelShader(blob_bytes(&pixel_blob), None, Some(&mut pixel_shader))?;
            // the layout is validated against the vertex shader signature
            device.CreateInputLayout(&input_element_descs(), vertex_bytecode, Some(&mut input_layout))?;
        }

        Ok(Self {
            vertex_shader: vertex_shader.ok_or(D3D11Error::MissingObject("vertex shader"))?,
            pixel_shader: pixel_shader.ok_or(D3D11Error::MissingObject("pixel shader"))?,
            input_layout: input_layout.ok_or(D3D11Error::MissingObject("input layout"))?,
            rasterizer_state: create_rasterizer_state(device)?,
            depth_stencil_state: create_depth_stencil_state(device)?,
        })
    }
}

fn create_rasterizer_state(device: &ID3D11Device) -> Result<ID3D11RasterizerState> {
    let desc = D3D11_RASTERIZER_DESC {
        FillMode: D3D11_FILL_SOLID,
        CullMode: D3D11_CULL_BACK,
        // the mesh winds counter-clockwise seen from outside
        FrontCounterClockwise: TRUE,
        DepthBias: 0,
        DepthBiasClamp: 0.0,
        SlopeScaledDepthBias: 0.0,
        DepthClipEnable: TRUE,
        ScissorEnable: FALSE,
        MultisampleEnable: FALSE,
        AntialiasedLineEnable: FALSE,
    };
    let mut state = None;
    unsafe { device.CreateRasterizerState(&desc, Some(&mut state))? };
    state.ok_or(D3D11Error::MissingObject("rasterizer state"))
}

fn create_depth_stencil_state(device: &ID3D11Device) -> Result<ID3D11DepthStencilState> {
    let desc = D3D11_DEPTH_STENCIL_DESC {
        DepthEnable: TRUE,
        DepthWriteMask: D3D11_DEPTH_WRITE_MASK_ALL,
        DepthFunc: D3D11_COMPARISON_LESS,
        StencilEnable: FALSE,
        ..Default::default()
    };
    let mut state = None;
    unsafe { device.CreateDepthStencilState(&desc, Some(&mut state))? };
    state.ok_or(D3D11Error::MissingObject("depth stencil state"))
}
