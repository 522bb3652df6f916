extern crate memoffset;
extern crate nalgebra_glm as glm;

pub mod backend;
pub mod buffers;
pub mod depth;
pub mod devices;
pub mod drawing;
pub mod graphics_pipeline;
pub mod main_loop;
pub mod presentation;
pub mod textures;
pub mod uniforms;
pub mod util;
pub mod window;

pub use main_loop::run;
