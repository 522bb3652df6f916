use crate::util::result::{Result, VulkanError};
use crate::window::{WindowSize, WindowSurface};

use winit::{dpi::PhysicalSize, event_loop::EventLoop, window::Window, window::WindowBuilder};

pub fn create_winit_window(
    title: &str,
    width: u32,
    height: u32,
    event_loop: &EventLoop<()>,
) -> Result<Window> {
    WindowBuilder::new()
        .with_title(title)
        .with_inner_size(PhysicalSize::new(width, height))
        .build(event_loop)
        .map_err(|error| VulkanError::WindowCreateFailure(error.to_string()))
}

pub fn get_window_size_from_winit(winit_window: &Window) -> WindowSize {
    let size = winit_window.inner_size();
    WindowSize {
        width: size.width,
        height: size.height,
    }
}

#[cfg(all(unix, not(target_os = "android"), not(target_os = "macos")))]
pub fn get_window_surface_from_winit(winit_window: &Window) -> Result<WindowSurface> {
    use winit::platform::unix::WindowExtUnix;

    let xlib_window = winit_window
        .xlib_window()
        .ok_or(VulkanError::WindowIncorrectPlatformSurface)?;
    let xlib_display = winit_window
        .xlib_display()
        .ok_or(VulkanError::WindowIncorrectPlatformSurface)?;
    Ok(WindowSurface::X11Surface {
        xlib_window,
        xlib_display: xlib_display as *const _,
    })
}

#[cfg(target_os = "windows")]
pub fn get_window_surface_from_winit(winit_window: &Window) -> Result<WindowSurface> {
    use winit::platform::windows::WindowExtWindows;

    Ok(WindowSurface::WindowsSurface {
        hinstance: winit_window.hinstance() as *const _,
        hwnd: winit_window.hwnd() as *const _,
    })
}
