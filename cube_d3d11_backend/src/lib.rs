//! Direct3D 11 rendition of the rotating cube. Only the pure helpers build off Windows,
//! everything that touches the device lives behind `cfg(target_os = "windows")`.

pub mod adapter;
pub mod layout;
pub mod main_loop;
pub mod result;
pub mod shaders;

#[cfg(target_os = "windows")]
mod buffers;
#[cfg(target_os = "windows")]
mod device;
#[cfg(target_os = "windows")]
mod pipeline;
#[cfg(target_os = "windows")]
mod renderer;
#[cfg(target_os = "windows")]
mod swapchain;
#[cfg(target_os = "windows")]
mod texture;

pub use main_loop::run;
