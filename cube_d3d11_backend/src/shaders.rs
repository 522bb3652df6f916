//! HLSL for the cube, compiled at startup with `D3DCompile`.
//!
//! The matrices arrive column major from glm, which is also the default cbuffer packing,
//! so `mul(matrix, vector)` composes the same way it does in GLSL.

//////////////////////// Consts ///////////////////////
pub const SHADER_ENTRY_POINT: &str = "main";
pub const VERTEX_SHADER_TARGET: &str = "vs_5_0";
pub const PIXEL_SHADER_TARGET: &str = "ps_5_0";

pub const VERTEX_SHADER_SOURCE: &str = r#"
cbuffer UniformBufferObject : register(b0) {
    float4x4 model;
    float4x4 view;
    float4x4 proj;
};

struct VS_INPUT {
    float3 pos : POSITION;
    float2 tex : TEXCOORD0;
};

struct PS_INPUT {
    float4 pos : SV_POSITION;
    float2 tex : TEXCOORD0;
};

PS_INPUT main(VS_INPUT input) {
    PS_INPUT output;
    output.pos = mul(proj, mul(view, mul(model, float4(input.pos, 1.0))));
    output.tex = input.tex;
    return output;
}
"#;

pub const PIXEL_SHADER_SOURCE: &str = r#"
Texture2D cubeTexture : register(t0);
SamplerState cubeSampler : register(s0);

struct PS_INPUT {
    float4 pos : SV_POSITION;
    float2 tex : TEXCOORD0;
};

float4 main(PS_INPUT input) : SV_TARGET {
    return cubeTexture.Sample(cubeSampler, input.tex);
}
"#;
//////////////////////// Enums ///////////////////////
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}
//////////////////////// Impls ///////////////////////
impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Pixel => "pixel",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            ShaderStage::Vertex => VERTEX_SHADER_SOURCE,
            ShaderStage::Pixel => PIXEL_SHADER_SOURCE,
        }
    }

    pub fn target(self) -> &'static str {
        match self {
            ShaderStage::Vertex => VERTEX_SHADER_TARGET,
            ShaderStage::Pixel => PIXEL_SHADER_TARGET,
        }
    }
}

#[cfg(target_os = "windows")]
pub use self::compiler::{blob_bytes, compile_shader};

#[cfg(target_os = "windows")]
mod compiler {
    use super::ShaderStage;
    use crate::result::{D3D11Error, Result};

    use log::debug;
    use windows::core::{s, PCSTR};
    use windows::Win32::Graphics::Direct3D::{
        Fxc::{D3DCompile, D3DCOMPILE_DEBUG, D3DCOMPILE_ENABLE_STRICTNESS, D3DCOMPILE_SKIP_OPTIMIZATION},
        ID3DBlob,
    };

    fn target_pcstr(stage: ShaderStage) -> PCSTR {
        match stage {
            ShaderStage::Vertex => s!("vs_5_0"),
            ShaderStage::Pixel => s!("ps_5_0"),
        }
    }

    /// Views the contents of a blob as bytes. The slice lives as long as the blob.
    pub fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
        unsafe { std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()) }
    }

    /// Compiles the embedded source of `stage`. A failed compile carries the compiler output.
    pub fn compile_shader(stage: ShaderStage) -> Result<ID3DBlob> {
        let source = stage.source();
        let flags = if cfg!(debug_assertions) {
            D3DCOMPILE_ENABLE_STRICTNESS | D3DCOMPILE_DEBUG | D3DCOMPILE_SKIP_OPTIMIZATION
        } else {
            D3DCOMPILE_ENABLE_STRICTNESS
        };

        let mut code: Option<ID3DBlob> = None;
        let mut errors: Option<ID3DBlob> = None;
        let compiled = unsafe {
            D3DCompile(
                source.as_ptr() as *const _,
                source.len(),
                None,
                None,
                None,
                s!("main"),
                target_pcstr(stage),
                flags,
                0,
                &mut code,
                Some(&mut errors),
            )
        };

        if let Err(error) = compiled {
            let message = match errors.as_ref() {
                Some(errors) => String::from_utf8_lossy(blob_bytes(errors)).trim_end().to_owned(),
                None => error.message().to_string(),
            };
            return Err(D3D11Error::ShaderCompileFailed {
                stage: stage.name(),
                message,
            });
        }

        let code = code.ok_or(D3D11Error::MissingObject("shader bytecode"))?;
        debug!(
            "Compiled {} shader for {} ({} bytes)",
            stage.name(),
            stage.target(),
            unsafe { code.GetBufferSize() }
        );
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_define_the_entry_point() {
        let entry = format!(" {}(", SHADER_ENTRY_POINT);
        assert!(VERTEX_SHADER_SOURCE.contains(&entry));
        assert!(PIXEL_SHADER_SOURCE.contains(&entry));
    }

    #[test]
    fn constant_buffer_matches_uniform_block_order() {
        let model = VERTEX_SHADER_SOURCE.find("float4x4 model").unwrap();
        let view = VERTEX_SHADER_SOURCE.find("float4x4 view").unwrap();
        let proj = VERTEX_SHADER_SOURCE.find("float4x4 proj").unwrap();
        assert!(model < view && view < proj);
        assert!(VERTEX_SHADER_SOURCE.contains("register(b0)"));
    }

    #[test]
    fn stages_use_shader_model_5() {
        assert_eq!(ShaderStage::Vertex.target(), "vs_5_0");
        assert_eq!(ShaderStage::Pixel.target(), "ps_5_0");
        assert_eq!(ShaderStage::Pixel.source(), PIXEL_SHADER_SOURCE);
        assert_eq!(ShaderStage::Vertex.name(), "vertex");
    }
}
