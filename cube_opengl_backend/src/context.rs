use crate::result::Result;

use glutin::{
    dpi::PhysicalSize,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
    Api, ContextBuilder, ContextWrapper, GlProfile, GlRequest, PossiblyCurrent,
};
use log::info;
//////////////////////// Consts ///////////////////////
pub const GL_VERSION: (u8, u8) = (4, 3);
pub const DEPTH_BITS: u8 = 24;
//////////////////////// Types ///////////////////////
pub type GlWindowContext = ContextWrapper<PossiblyCurrent, Window>;
//////////////////////// Fns ///////////////////////
/// Opens the window with a current core profile context and loads the GL function pointers.
pub fn create_windowed_context(
    title: &str,
    width: u32,
    height: u32,
    event_loop: &EventLoop<()>,
) -> Result<GlWindowContext> {
    let window_builder = WindowBuilder::new()
        .with_title(title)
        .with_inner_size(PhysicalSize::new(width, height));

    let not_current = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, GL_VERSION))
        .with_gl_profile(GlProfile::Core)
        .with_gl_debug_flag(cfg!(debug_assertions))
        .with_depth_buffer(DEPTH_BITS)
        .with_double_buffer(Some(true))
        .with_srgb(true)
        .with_vsync(true)
        .build_windowed(window_builder, event_loop)?;

    let windowed_context = unsafe { not_current.make_current().map_err(|(_, error)| error)? };

    gl::load_with(|symbol| windowed_context.get_proc_address(symbol) as *const _);
    info!(
        "Created OpenGL {}.{} core context with pixel format {:?}",
        GL_VERSION.0,
        GL_VERSION.1,
        windowed_context.get_pixel_format()
    );

    Ok(windowed_context)
}
