use crate::result::{D3D11Error, Result};

use cube_common::texture::TextureSource;
use log::debug;
use windows::Win32::Graphics::{
    Direct3D11::{
        ID3D11Device, ID3D11DeviceContext, ID3D11SamplerState, ID3D11ShaderResourceView,
        ID3D11Texture2D, D3D11_BIND_RENDER_TARGET, D3D11_BIND_SHADER_RESOURCE,
        D3D11_COMPARISON_NEVER, D3D11_FILTER_MIN_MAG_MIP_LINEAR, D3D11_FLOAT32_MAX,
        D3D11_RESOURCE_MISC_GENERATE_MIPS, D3D11_SAMPLER_DESC, D3D11_TEXTURE2D_DESC,
        D3D11_TEXTURE_ADDRESS_WRAP, D3D11_USAGE_DEFAULT,
    },
    Dxgi::Common::{DXGI_FORMAT_R8G8B8A8_UNORM_SRGB, DXGI_SAMPLE_DESC},
};

/// The cube texture with its full mip chain, plus the sampler the pixel shader reads it with.
pub struct CubeTexture {
    // kept so the view never outlives its resource on our side
    _texture: ID3D11Texture2D,
    pub view: ID3D11ShaderResourceView,
    pub sampler: ID3D11SamplerState,
}

impl CubeTexture {
    pub fn new(
        texture_source: &dyn TextureSource,
        device: &ID3D11Device,
        context: &ID3D11DeviceContext,
    ) -> Result<Self> {
        let width = texture_source.get_width();
        let height = texture_source.get_height();
        let desc = D3D11_TEXTURE2D_DESC {
            Width: width,
            Height: height,
            // zero allocates the whole chain, which GenerateMips then fills
            MipLevels: 0,
            ArraySize: 1,
            Format: DXGI_FORMAT_R8G8B8A8_UNORM_SRGB,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Usage: D3D11_USAGE_DEFAULT,
            BindFlags: (D3D11_BIND_SHADER_RESOURCE.0 | D3D11_BIND_RENDER_TARGET.0) as u32,
            CPUAccessFlags: 0,
            MiscFlags: D3D11_RESOURCE_MISC_GENERATE_MIPS.0 as u32,
        };
        let mut texture: Option<ID3D11Texture2D> = None;
        unsafe { device.CreateTexture2D(&desc, None, Some(&mut texture))? };
        let texture = texture.ok_or(D3D11Error::MissingObject("texture"))?;

        let pixels = texture_source.get_pixels();
        unsafe {
            context.UpdateSubresource(&texture, 0, None, pixels.as_ptr() as *const _, width * 4, 0);
        }

        let mut view = None;
        unsafe { device.CreateShaderResourceView(&texture, None, Some(&mut view))? };
        let view = view.ok_or(D3D11Error::MissingObject("texture view"))?;
        unsafe { context.GenerateMips(&view) };
        debug!(
            "Uploaded {}x{} texture, generating {} mip levels",
            width,
            height,
            texture_source.mip_levels()
        );

        let sampler = create_sampler(device)?;
        Ok(Self {
            _texture: texture,
            view,
            sampler,
        })
    }
}

fn create_sampler(device: &ID3D11Device) -> Result<ID3D11SamplerState> {
    let desc = D3D11_SAMPLER_DESC {
        Filter: D3D11_FILTER_MIN_MAG_MIP_LINEAR,
        AddressU: D3D11_TEXTURE_ADDRESS_WRAP,
        AddressV: D3D11_TEXTURE_ADDRESS_WRAP,
        AddressW: D3D11_TEXTURE_ADDRESS_WRAP,
        MipLODBias: 0.0,
        MaxAnisotropy: 1,
        ComparisonFunc: D3D11_COMPARISON_NEVER,
        BorderColor: [0.0, 0.0, 0.0, 0.0],
        MinLOD: 0.0,
        MaxLOD: D3D11_FLOAT32_MAX,
    };
    let mut sampler = None;
    unsafe { device.CreateSamplerState(&desc, Some(&mut sampler))? };
    sampler.ok_or(D3D11Error::MissingObject("sampler"))
}
