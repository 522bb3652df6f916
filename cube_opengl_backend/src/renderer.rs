use crate::debug;
use crate::mesh::CubeMesh;
use crate::result::Result;
use crate::shader::ShaderProgram;
use crate::texture::GlTexture;

use cube_common::{
    camera::{Camera, ClipSpace},
    config::{CubeConfig, CLEAR_COLOR, TEXTURE_PATH},
    rotation::CubeRotation,
    texture::FilesystemTextureSource,
    uniforms::UniformBufferObject,
};
use gl::types::GLsizei;
use log::{debug, info};
use std::convert::TryFrom;

const TEXTURE_UNIT: u32 = 0;

/// GL state and objects for the cube. Fields drop in declaration order, all while the context is current.
pub struct GlRenderer {
    program: ShaderProgram,
    mesh: CubeMesh,
    texture: GlTexture,
    camera: Camera,
}

impl GlRenderer {
    /// # Safety
    ///
    /// A context has to be current and its functions loaded. The renderer has to be dropped
    /// before that context.
    pub unsafe fn new(config: &CubeConfig, width: u32, height: u32) -> Result<Self> {
        if cfg!(debug_assertions) {
            debug::enable_debug_output();
        }

        gl::Enable(gl::DEPTH_TEST);
        gl::DepthFunc(gl::LESS);
        gl::Enable(gl::CULL_FACE);
        gl::CullFace(gl::BACK);
        gl::FrontFace(gl::CCW);
        // the texture is sampled as sRGB, so writes have to be encoded back
        gl::Enable(gl::FRAMEBUFFER_SRGB);
        gl::ClearColor(CLEAR_COLOR[0], CLEAR_COLOR[1], CLEAR_COLOR[2], CLEAR_COLOR[3]);

        let program = ShaderProgram::new()?;
        let mesh = CubeMesh::new()?;
        let texture_source = FilesystemTextureSource::new(&config.resolve_resource(TEXTURE_PATH)?)?;
        let texture = GlTexture::new(&texture_source)?;

        let renderer = Self {
            program,
            mesh,
            texture,
            camera: Camera::default(),
        };
        renderer.resize(width, height)?;
        info!("OpenGL renderer ready");
        Ok(renderer)
    }

    pub unsafe fn resize(&self, width: u32, height: u32) -> Result<()> {
        debug!("Setting viewport to {}x{}", width, height);
        gl::Viewport(0, 0, GLsizei::try_from(width)?, GLsizei::try_from(height)?);
        Ok(())
    }

    /// Clears and draws one frame into the back buffer. Nothing is drawn for an empty window.
    pub unsafe fn draw(&self, width: u32, height: u32, rotation: &CubeRotation) {
        let ubo = match UniformBufferObject::for_frame(
            &self.camera,
            ClipSpace::OpenGl,
            rotation,
            width,
            height,
        ) {
            Some(ubo) => ubo,
            None => return,
        };

        gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);

        self.program.bind();
        self.program.set_matrices(&ubo.model, &ubo.view, &ubo.proj);
        self.program.set_texture_unit(TEXTURE_UNIT as i32);
        self.texture.bind(TEXTURE_UNIT);
        self.mesh.draw();
    }
}
