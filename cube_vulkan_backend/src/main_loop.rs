use crate::backend::vulkan_app::VulkanApp;
use crate::util::result::Result;
use crate::window::winit_window;

use cube_common::{
    apptime::AppTime,
    config::{CubeConfig, VULKAN_WINDOW_TITLE, WINDOW_HEIGHT, WINDOW_WIDTH},
    rotation::CubeRotation,
};
use log::{error, info};
use winit::{
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
};

/// Opens the window and draws the rotating cube until it is closed.
///
/// Only returns when setup fails. Once the event loop runs it owns the process: a clean close
/// exits with status 0, and the first error while drawing is logged and exits with status 1.
pub fn run() -> Result<()> {
    let config = CubeConfig::new()?;
    let event_loop = EventLoop::new();
    let winit_window = winit_window::create_winit_window(
        VULKAN_WINDOW_TITLE,
        WINDOW_WIDTH,
        WINDOW_HEIGHT,
        &event_loop,
    )?;

    let window_surface = winit_window::get_window_surface_from_winit(&winit_window)?;
    let window_size = winit_window::get_window_size_from_winit(&winit_window);

    let mut vulkan_app = Some(VulkanApp::new(
        VULKAN_WINDOW_TITLE,
        &window_surface,
        &window_size,
        &config,
    )?);
    let mut apptime = AppTime::new();
    let mut rotation = CubeRotation::new();
    let mut failed = false;

    event_loop.run(move |event, _, control_flow| {
        let app = match vulkan_app.as_mut() {
            Some(app) => app,
            None => return,
        };

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => *control_flow = ControlFlow::Exit,
                WindowEvent::Resized(size) => {
                    info!("Window resized to {}x{}", size.width, size.height);
                    app.window_resized = true;
                }
                _ => {}
            },
            Event::MainEventsCleared => winit_window.request_redraw(),
            Event::RedrawRequested(_) => {
                apptime.update();
                rotation.advance(apptime.delta_seconds());

                let window_size = winit_window::get_window_size_from_winit(&winit_window);
                if let Err(draw_error) = app.draw_frame(&window_size, &rotation) {
                    error!("Failed to draw frame {}: {}", apptime.frame, draw_error);
                    failed = true;
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::LoopDestroyed => {
                info!("Leaving main loop after {} frames", apptime.frame);
                if let Err(idle_error) = app.wait_until_device_idle() {
                    error!("Failed while waiting until device idle: {}", idle_error);
                    failed = true;
                }
                // the loop never returns, so resources are released here rather than at scope end
                vulkan_app = None;
                if failed {
                    std::process::exit(1);
                }
            }
            _ => {}
        }
    })
}
