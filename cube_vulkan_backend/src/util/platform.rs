use crate::util::result::{Result, VulkanError};
use crate::window::WindowSurface;

#[cfg(target_os = "windows")]
use ash::extensions::khr::Win32Surface;
#[cfg(all(unix, not(target_os = "android"), not(target_os = "macos")))]
use ash::extensions::khr::XlibSurface;

use ash::extensions::ext::DebugUtils;
use ash::extensions::khr::Surface;

use ash::vk;
use std::os::raw::c_char;

// required extensions ------------------------------------------------------
#[cfg(target_os = "windows")]
pub fn required_extension_names(with_debug_utils: bool) -> Vec<*const c_char> {
    let mut names = vec![Surface::name().as_ptr(), Win32Surface::name().as_ptr()];
    if with_debug_utils {
        names.push(DebugUtils::name().as_ptr());
    }
    names
}

#[cfg(all(unix, not(target_os = "android"), not(target_os = "macos")))]
pub fn required_extension_names(with_debug_utils: bool) -> Vec<*const c_char> {
    let mut names = vec![Surface::name().as_ptr(), XlibSurface::name().as_ptr()];
    if with_debug_utils {
        names.push(DebugUtils::name().as_ptr());
    }
    names
}

// surfaces --------------------------------------------------------------------------
pub struct SurfaceContainer {
    pub surface_loader: Surface,
    pub surface: vk::SurfaceKHR,
}

impl SurfaceContainer {
    pub unsafe fn destroy(&mut self) {
        self.surface_loader.destroy_surface(self.surface, None);
    }
}

#[cfg(all(unix, not(target_os = "android"), not(target_os = "macos")))]
pub fn create_surface(
    entry: &ash::Entry,
    instance: &ash::Instance,
    window_surface: &WindowSurface,
) -> Result<SurfaceContainer> {
    let (x11_window, x11_display) = if let WindowSurface::X11Surface {
        xlib_window,
        xlib_display,
    } = *window_surface
    {
        (xlib_window, xlib_display)
    } else {
        return Err(VulkanError::WindowIncorrectPlatformSurface);
    };

    let x11_create_info = vk::XlibSurfaceCreateInfoKHR::builder()
        .window(x11_window as vk::Window)
        .dpy(x11_display as *mut vk::Display);
    let xlib_surface_loader = XlibSurface::new(entry, instance);
    let surface = unsafe { xlib_surface_loader.create_xlib_surface(&x11_create_info, None)? };
    Ok(SurfaceContainer {
        surface_loader: Surface::new(entry, instance),
        surface,
    })
}

#[cfg(target_os = "windows")]
pub fn create_surface(
    entry: &ash::Entry,
    instance: &ash::Instance,
    window_surface: &WindowSurface,
) -> Result<SurfaceContainer> {
    use std::os::raw::c_void;
    use std::ptr;
    use winapi::um::libloaderapi::GetModuleHandleW;

    let hwnd = if let WindowSurface::WindowsSurface { hwnd, .. } = *window_surface {
        hwnd
    } else {
        return Err(VulkanError::WindowIncorrectPlatformSurface);
    };

    // the module of the running exe owns the window class winit registered
    let hinstance = unsafe { GetModuleHandleW(ptr::null()) as *const c_void };
    let win32_create_info = vk::Win32SurfaceCreateInfoKHR::builder()
        .hinstance(hinstance)
        .hwnd(hwnd);
    let win32_surface_loader = Win32Surface::new(entry, instance);
    let surface = unsafe { win32_surface_loader.create_win32_surface(&win32_create_info, None)? };
    Ok(SurfaceContainer {
        surface_loader: Surface::new(entry, instance),
        surface,
    })
}
