pub mod winit_window;

use core::ffi::c_void;
use std::os::raw::c_ulong;
//////////////////////// Enums ///////////////////////
/// Raw native handles the Vulkan surface is created from.
pub enum WindowSurface {
    WindowsSurface {
        hinstance: *const c_void,
        hwnd: *const c_void,
    },
    X11Surface {
        xlib_window: c_ulong,
        xlib_display: *const c_void,
    },
}
//////////////////////// Structs ///////////////////////
/// Size of the window's drawable area in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}
//////////////////////// Impls ///////////////////////
impl WindowSize {
    pub fn is_minimized(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
