use crate::result::Result;

#[cfg(not(target_os = "windows"))]
pub fn run() -> Result<()> {
    Err(crate::result::D3D11Error::Unsupported(std::env::consts::OS))
}

/// Opens the window and draws the rotating cube until it is closed.
///
/// Only returns when setup fails. Once the event loop runs it owns the process: a clean close
/// exits with status 0, and the first error while drawing is logged and exits with status 1.
#[cfg(target_os = "windows")]
pub fn run() -> Result<()> {
    use crate::renderer::D3D11Renderer;
    use crate::result::D3D11Error;

    use cube_common::{
        apptime::AppTime,
        config::{CubeConfig, D3D11_WINDOW_TITLE, WINDOW_HEIGHT, WINDOW_WIDTH},
        rotation::CubeRotation,
    };
    use log::{error, info};
    use windows::Win32::Foundation::HWND;
    use winit::{
        dpi::PhysicalSize,
        event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
        event_loop::{ControlFlow, EventLoop},
        platform::windows::WindowExtWindows,
        window::WindowBuilder,
    };

    let config = CubeConfig::new()?;
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(D3D11_WINDOW_TITLE)
        .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .build(&event_loop)
        .map_err(|error| D3D11Error::WindowCreateFailure(error.to_string()))?;

    let size = window.inner_size();
    let hwnd = HWND(window.hwnd() as *mut _);
    let mut renderer = Some(D3D11Renderer::new(&config, hwnd, size.width, size.height)?);
    let mut apptime = AppTime::new();
    let mut rotation = CubeRotation::new();
    let mut failed = false;

    event_loop.run(move |event, _, control_flow| {
        let d3d_renderer = match renderer.as_mut() {
            Some(d3d_renderer) => d3d_renderer,
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
                    if let Err(resize_error) = d3d_renderer.resize(size.width, size.height) {
                        error!("Failed to resize swapchain: {}", resize_error);
                        failed = true;
                        *control_flow = ControlFlow::Exit;
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared => window.request_redraw(),
            Event::RedrawRequested(_) => {
                apptime.update();
                rotation.advance(apptime.delta_seconds());

                let size = window.inner_size();
                if let Err(draw_error) = d3d_renderer.draw(size.width, size.height, &rotation) {
                    error!("Failed to draw frame {}: {}", apptime.frame, draw_error);
                    failed = true;
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::LoopDestroyed => {
                info!("Leaving main loop after {} frames", apptime.frame);
                renderer = None;
                if failed {
                    std::process::exit(1);
                }
            }
            _ => {}
        }
    })
}

#[cfg(all(test, not(target_os = "windows")))]
mod tests {
    use super::*;
    use crate::result::D3D11Error;

    #[test]
    fn other_platforms_report_unsupported() {
        match run() {
            Err(D3D11Error::Unsupported(os)) => assert_eq!(os, std::env::consts::OS),
            other => panic!("expected unsupported, got {:?}", other.map(|_| ())),
        }
    }
}
