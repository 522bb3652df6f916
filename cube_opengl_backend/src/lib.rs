extern crate nalgebra_glm as glm;

pub mod context;
pub mod debug;
pub mod main_loop;
pub mod mesh;
pub mod renderer;
pub mod result;
pub mod shader;
pub mod texture;

pub use main_loop::run;
