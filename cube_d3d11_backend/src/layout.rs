use cube_common::mesh::CubeVertex;
use memoffset::offset_of;

pub const POSITION_SEMANTIC: &str = "POSITION";
pub const TEXCOORD_SEMANTIC: &str = "TEXCOORD";

/// Distance between two vertices in the vertex buffer.
pub fn vertex_stride() -> u32 {
    std::mem::size_of::<CubeVertex>() as u32
}

/// Byte offsets of (position, texcoord) inside a vertex.
pub fn attribute_offsets() -> (u32, u32) {
    (
        offset_of!(CubeVertex, pos) as u32,
        offset_of!(CubeVertex, tex_coord) as u32,
    )
}

#[cfg(target_os = "windows")]
pub fn input_element_descs() -> [windows::Win32::Graphics::Direct3D11::D3D11_INPUT_ELEMENT_DESC; 2]
{
    use windows::core::s;
    use windows::Win32::Graphics::{
        Direct3D11::{D3D11_INPUT_ELEMENT_DESC, D3D11_INPUT_PER_VERTEX_DATA},
        Dxgi::Common::{DXGI_FORMAT_R32G32B32_FLOAT, DXGI_FORMAT_R32G32_FLOAT},
    };

    let (position_offset, tex_coord_offset) = attribute_offsets();
    [
        D3D11_INPUT_ELEMENT_DESC {
            SemanticName: s!("POSITION"),
            SemanticIndex: 0,
            Format: DXGI_FORMAT_R32G32B32_FLOAT,
            InputSlot: 0,
            AlignedByteOffset: position_offset,
            InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
            InstanceDataStepRate: 0,
        },
        D3D11_INPUT_ELEMENT_DESC {
            SemanticName: s!("TEXCOORD"),
            SemanticIndex: 0,
            Format: DXGI_FORMAT_R32G32_FLOAT,
            InputSlot: 0,
            AlignedByteOffset: tex_coord_offset,
            InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
            InstanceDataStepRate: 0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::VERTEX_SHADER_SOURCE;

    #[test]
    fn offsets_match_interleaved_vertex() {
        assert_eq!(attribute_offsets(), (0, 12));
        assert_eq!(vertex_stride(), 20);
    }

    #[test]
    fn vertex_shader_declares_both_semantics() {
        assert!(VERTEX_SHADER_SOURCE.contains(&format!("float3 pos : {}", POSITION_SEMANTIC)));
        assert!(VERTEX_SHADER_SOURCE.contains(&format!("float2 tex : {}", TEXCOORD_SEMANTIC)));
    }
}
