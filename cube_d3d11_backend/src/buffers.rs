use crate::result::{D3D11Error, Result};

use cube_common::{
    mesh::{cube_vertices_as_bytes, CUBE_VERTEX_COUNT},
    uniforms::{copy_uniform_to_memory, UniformBufferObject},
};
use log::debug;
use std::convert::TryFrom;
use windows::Win32::Graphics::Direct3D11::{
    ID3D11Buffer, ID3D11Device, ID3D11DeviceContext, D3D11_BIND_CONSTANT_BUFFER,
    D3D11_BIND_VERTEX_BUFFER, D3D11_BUFFER_DESC, D3D11_CPU_ACCESS_WRITE,
    D3D11_MAPPED_SUBRESOURCE, D3D11_MAP_WRITE_DISCARD, D3D11_SUBRESOURCE_DATA,
    D3D11_USAGE_DYNAMIC, D3D11_USAGE_IMMUTABLE,
};

pub struct VertexBuffer {
    pub buffer: ID3D11Buffer,
    pub vertex_count: u32,
}

impl VertexBuffer {
    pub fn new(device: &ID3D11Device) -> Result<Self> {
        let bytes = cube_vertices_as_bytes();
        let desc = D3D11_BUFFER_DESC {
            ByteWidth: u32::try_from(bytes.len())?,
            Usage: D3D11_USAGE_IMMUTABLE,
            BindFlags: D3D11_BIND_VERTEX_BUFFER.0 as u32,
            CPUAccessFlags: 0,
            MiscFlags: 0,
            StructureByteStride: 0,
        };
        let init_data = D3D11_SUBRESOURCE_DATA {
            pSysMem: bytes.as_ptr() as *const _,
            SysMemPitch: 0,
            SysMemSlicePitch: 0,
        };
        let mut buffer = None;
        unsafe { device.CreateBuffer(&desc, Some(&init_data), Some(&mut buffer))? };
        debug!("Uploaded {} vertex bytes", bytes.len());

        Ok(Self {
            buffer: buffer.ok_or(D3D11Error::MissingObject("vertex buffer"))?,
            vertex_count: u32::try_from(CUBE_VERTEX_COUNT)?,
        })
    }
}

/// CPU writable cbuffer holding one `UniformBufferObject`, discarded and rewritten every frame.
pub struct ConstantBuffer {
    pub buffer: ID3D11Buffer,
}

impl ConstantBuffer {
    pub fn new(device: &ID3D11Device) -> Result<Self> {
        let desc = D3D11_BUFFER_DESC {
            // cbuffers are sized in 16 byte registers, three mat4s already are
            ByteWidth: u32::try_from(std::mem::size_of::<UniformBufferObject>())?,
            Usage: D3D11_USAGE_DYNAMIC,
            BindFlags: D3D11_BIND_CONSTANT_BUFFER.0 as u32,
            CPUAccessFlags: D3D11_CPU_ACCESS_WRITE.0 as u32,
            MiscFlags: 0,
            StructureByteStride: 0,
        };
        let mut buffer = None;
        unsafe { device.CreateBuffer(&desc, None, Some(&mut buffer))? };

        Ok(Self {
            buffer: buffer.ok_or(D3D11Error::MissingObject("constant buffer"))?,
        })
    }

    pub fn update(&self, context: &ID3D11DeviceContext, ubo: &UniformBufferObject) -> Result<()> {
        let mut mapped = D3D11_MAPPED_SUBRESOURCE::default();
        unsafe {
            context.Map(&self.buffer, 0, D3D11_MAP_WRITE_DISCARD, 0, Some(&mut mapped))?;
            copy_uniform_to_memory(ubo, mapped.pData);
            context.Unmap(&self.buffer, 0);
        }
        Ok(())
    }
}
