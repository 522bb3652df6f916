use crate::result::{OpenGlError, Result};

use gl::types::{GLchar, GLenum, GLint, GLuint};
use log::{debug, info};
use std::ffi::CString;
use std::ptr;
//////////////////////// Consts ///////////////////////
pub const VERTEX_SHADER_SOURCE: &str = r#"#version 430 core

layout (location = 0) in vec3 in_position;
layout (location = 1) in vec2 in_tex_coords;

out vec2 tex_coords;

uniform mat4 model;
uniform mat4 view;
uniform mat4 projection;

void main() {
    tex_coords = in_tex_coords;
    gl_Position = projection * view * model * vec4(in_position, 1.0);
}
"#;

pub const FRAGMENT_SHADER_SOURCE: &str = r#"#version 430 core

in vec2 tex_coords;

out vec4 color;

uniform sampler2D texture_diffuse1;

void main() {
    color = vec4(texture(texture_diffuse1, tex_coords).rgb, 1.0);
}
"#;

pub const MODEL_UNIFORM: &str = "model";
pub const VIEW_UNIFORM: &str = "view";
pub const PROJECTION_UNIFORM: &str = "projection";
pub const TEXTURE_UNIFORM: &str = "texture_diffuse1";
//////////////////////// Structs ///////////////////////
/// Linked program plus the locations of the uniforms the cube needs.
pub struct ShaderProgram {
    pub program_id: GLuint,
    model_location: GLint,
    view_location: GLint,
    projection_location: GLint,
    texture_location: GLint,
}
//////////////////////// Impls ///////////////////////
impl ShaderProgram {
    /// # Safety
    ///
    /// A context has to be current and its functions loaded.
    pub unsafe fn new() -> Result<Self> {
        let vertex_shader = compile_shader(gl::VERTEX_SHADER, "vertex", VERTEX_SHADER_SOURCE)?;
        let fragment_shader =
            match compile_shader(gl::FRAGMENT_SHADER, "fragment", FRAGMENT_SHADER_SOURCE) {
                Ok(shader) => shader,
                Err(error) => {
                    gl::DeleteShader(vertex_shader);
                    return Err(error);
                }
            };

        let program_id = gl::CreateProgram();
        gl::AttachShader(program_id, vertex_shader);
        gl::AttachShader(program_id, fragment_shader);
        gl::LinkProgram(program_id);

        // the linked program keeps its own copy of the binaries
        gl::DetachShader(program_id, vertex_shader);
        gl::DetachShader(program_id, fragment_shader);
        gl::DeleteShader(vertex_shader);
        gl::DeleteShader(fragment_shader);

        let mut success: GLint = 0;
        gl::GetProgramiv(program_id, gl::LINK_STATUS, &mut success);
        if success == 0 {
            let log = program_info_log(program_id);
            gl::DeleteProgram(program_id);
            return Err(OpenGlError::ProgramLinkFailed(log));
        }

        let locations = [
            MODEL_UNIFORM,
            VIEW_UNIFORM,
            PROJECTION_UNIFORM,
            TEXTURE_UNIFORM,
        ]
        .iter()
        .map(|name| uniform_location(program_id, name))
        .collect::<Result<Vec<GLint>>>();
        let locations = match locations {
            Ok(locations) => locations,
            Err(error) => {
                gl::DeleteProgram(program_id);
                return Err(error);
            }
        };

        info!("Linked shader program {}", program_id);
        Ok(Self {
            program_id,
            model_location: locations[0],
            view_location: locations[1],
            projection_location: locations[2],
            texture_location: locations[3],
        })
    }

    pub unsafe fn bind(&self) {
        gl::UseProgram(self.program_id);
    }

    /// Expects the program to be bound.
    pub unsafe fn set_matrices(&self, model: &glm::Mat4, view: &glm::Mat4, projection: &glm::Mat4) {
        // nalgebra stores column major, which is what GL expects without transposing
        gl::UniformMatrix4fv(self.model_location, 1, gl::FALSE, model.as_ptr());
        gl::UniformMatrix4fv(self.view_location, 1, gl::FALSE, view.as_ptr());
        gl::UniformMatrix4fv(self.projection_location, 1, gl::FALSE, projection.as_ptr());
    }

    /// Expects the program to be bound.
    pub unsafe fn set_texture_unit(&self, unit: GLint) {
        gl::Uniform1i(self.texture_location, unit);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.program_id) };
    }
}
//////////////////////// Fns ///////////////////////
unsafe fn compile_shader(kind: GLenum, stage: &'static str, source: &str) -> Result<GLuint> {
    let source = CString::new(source)?;
    let shader = gl::CreateShader(kind);
    gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
    gl::CompileShader(shader);

    let mut success: GLint = 0;
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
    if success == 0 {
        let log = shader_info_log(shader);
        gl::DeleteShader(shader);
        return Err(OpenGlError::ShaderCompileFailed { stage, log });
    }
    debug!("Compiled {} shader {}", stage, shader);
    Ok(shader)
}

unsafe fn uniform_location(program_id: GLuint, name: &str) -> Result<GLint> {
    let c_name = CString::new(name)?;
    let location = gl::GetUniformLocation(program_id, c_name.as_ptr());
    if location < 0 {
        return Err(OpenGlError::UniformNotFound(name.to_owned()));
    }
    Ok(location)
}

unsafe fn shader_info_log(shader: GLuint) -> String {
    let mut length: GLint = 0;
    gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut length);
    let mut buffer = vec![0u8; length.max(1) as usize];
    gl::GetShaderInfoLog(
        shader,
        length,
        ptr::null_mut(),
        buffer.as_mut_ptr() as *mut GLchar,
    );
    info_log_to_string(buffer)
}

unsafe fn program_info_log(program: GLuint) -> String {
    let mut length: GLint = 0;
    gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut length);
    let mut buffer = vec![0u8; length.max(1) as usize];
    gl::GetProgramInfoLog(
        program,
        length,
        ptr::null_mut(),
        buffer.as_mut_ptr() as *mut GLchar,
    );
    info_log_to_string(buffer)
}

/// Drivers nul terminate the log and often end it with a newline.
fn info_log_to_string(mut buffer: Vec<u8>) -> String {
    if let Some(nul) = buffer.iter().position(|&byte| byte == 0) {
        buffer.truncate(nul);
    }
    String::from_utf8_lossy(&buffer).trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_log_stops_at_nul_and_trims() {
        let buffer = b"0(3) : error C0000: syntax error\n\0garbage".to_vec();
        assert_eq!(info_log_to_string(buffer), "0(3) : error C0000: syntax error");
        assert_eq!(info_log_to_string(vec![0]), "");
    }

    #[test]
    fn shaders_declare_the_uniforms_that_are_looked_up() {
        for name in [MODEL_UNIFORM, VIEW_UNIFORM, PROJECTION_UNIFORM].iter() {
            assert!(VERTEX_SHADER_SOURCE.contains(&format!("uniform mat4 {};", name)));
        }
        assert!(FRAGMENT_SHADER_SOURCE.contains(&format!("uniform sampler2D {};", TEXTURE_UNIFORM)));
        assert!(VERTEX_SHADER_SOURCE.starts_with("#version 430 core"));
        assert!(FRAGMENT_SHADER_SOURCE.starts_with("#version 430 core"));
    }
}
