//! Data shared by every cube backend: the mesh, the rotation clock, the camera matrices
//! and resource lookup. Nothing in here talks to a graphics API.

extern crate nalgebra_glm as glm;

pub mod apptime;
pub mod camera;
pub mod config;
pub mod macros;
pub mod mesh;
pub mod result;
pub mod rotation;
pub mod texture;
pub mod uniforms;
