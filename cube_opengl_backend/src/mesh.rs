use crate::result::{OpenGlError, Result};

use cube_common::mesh::{cube_vertices_as_bytes, CubeVertex, CUBE_VERTEX_COUNT};
use gl::types::{GLint, GLsizei, GLsizeiptr, GLuint};
use log::info;
use memoffset::offset_of;
use std::convert::TryFrom;
use std::os::raw::c_void;

pub const POSITION_ATTRIBUTE: GLuint = 0;
pub const TEX_COORD_ATTRIBUTE: GLuint = 1;

/// Vertex array plus the buffer holding the 36 cube vertices.
pub struct CubeMesh {
    pub vao: GLuint,
    pub vbo: GLuint,
    pub vertex_count: GLsizei,
}

/// (location, component count, byte offset) for each vertex attribute.
pub fn attribute_layout() -> [(GLuint, GLint, usize); 2] {
    [
        (POSITION_ATTRIBUTE, 3, offset_of!(CubeVertex, pos)),
        (TEX_COORD_ATTRIBUTE, 2, offset_of!(CubeVertex, tex_coord)),
    ]
}

impl CubeMesh {
    /// # Safety
    ///
    /// A context has to be current and its functions loaded.
    pub unsafe fn new() -> Result<Self> {
        let mut vao: GLuint = 0;
        let mut vbo: GLuint = 0;
        gl::GenVertexArrays(1, &mut vao);
        gl::GenBuffers(1, &mut vbo);
        if vao == 0 || vbo == 0 {
            gl::DeleteBuffers(1, &vbo);
            gl::DeleteVertexArrays(1, &vao);
            return Err(OpenGlError::ObjectCreateFailed("cube vertex array"));
        }

        let bytes = cube_vertices_as_bytes();
        gl::BindVertexArray(vao);
        gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
        gl::BufferData(
            gl::ARRAY_BUFFER,
            GLsizeiptr::try_from(bytes.len())?,
            bytes.as_ptr() as *const c_void,
            gl::STATIC_DRAW,
        );

        let stride = GLsizei::try_from(std::mem::size_of::<CubeVertex>())?;
        for &(location, components, offset) in attribute_layout().iter() {
            gl::EnableVertexAttribArray(location);
            gl::VertexAttribPointer(
                location,
                components,
                gl::FLOAT,
                gl::FALSE,
                stride,
                offset as *const c_void,
            );
        }

        gl::BindVertexArray(0);
        gl::BindBuffer(gl::ARRAY_BUFFER, 0);

        info!("Loaded cube mesh (vao={}, vbo={})", vao, vbo);
        Ok(Self {
            vao,
            vbo,
            vertex_count: GLsizei::try_from(CUBE_VERTEX_COUNT)?,
        })
    }

    pub unsafe fn draw(&self) {
        gl::BindVertexArray(self.vao);
        gl::DrawArrays(gl::TRIANGLES, 0, self.vertex_count);
        gl::BindVertexArray(0);
    }
}

impl Drop for CubeMesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_match_the_packed_vertex() {
        let layout = attribute_layout();
        assert_eq!(layout[0], (0, 3, 0));
        assert_eq!(layout[1], (1, 2, 12));
        assert_eq!(std::mem::size_of::<CubeVertex>(), 20);
    }
}
