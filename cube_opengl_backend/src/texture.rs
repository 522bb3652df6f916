use crate::result::{OpenGlError, Result};

use cube_common::texture::TextureSource;
use gl::types::{GLint, GLsizei, GLuint};
use log::info;
use std::convert::TryFrom;
use std::os::raw::c_void;

/// 2D texture with a full mip chain, sampled trilinearly with repeat wrapping.
pub struct GlTexture {
    pub texture_id: GLuint,
}

impl GlTexture {
    /// # Safety
    ///
    /// A context has to be current and its functions loaded.
    pub unsafe fn new(texture_source: &dyn TextureSource) -> Result<Self> {
        let width = GLsizei::try_from(texture_source.get_width())?;
        let height = GLsizei::try_from(texture_source.get_height())?;

        let mut texture_id: GLuint = 0;
        gl::GenTextures(1, &mut texture_id);
        if texture_id == 0 {
            return Err(OpenGlError::ObjectCreateFailed("texture"));
        }

        gl::BindTexture(gl::TEXTURE_2D, texture_id);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as GLint);
        gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_MIN_FILTER,
            gl::LINEAR_MIPMAP_LINEAR as GLint,
        );
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);

        // rows are tightly packed RGBA8
        gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
        gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            gl::SRGB8_ALPHA8 as GLint,
            width,
            height,
            0,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            texture_source.get_pixels().as_ptr() as *const c_void,
        );
        gl::GenerateMipmap(gl::TEXTURE_2D);
        gl::BindTexture(gl::TEXTURE_2D, 0);

        info!(
            "Loaded {}x{} texture {} with {} mip levels",
            width,
            height,
            texture_id,
            texture_source.mip_levels()
        );
        Ok(Self { texture_id })
    }

    pub unsafe fn bind(&self, unit: GLuint) {
        gl::ActiveTexture(gl::TEXTURE0 + unit);
        gl::BindTexture(gl::TEXTURE_2D, self.texture_id);
    }
}

impl Drop for GlTexture {
    fn drop(&mut self) {
        unsafe { gl::DeleteTextures(1, &self.texture_id) };
    }
}
