use crate::context::create_windowed_context;
use crate::renderer::GlRenderer;
use crate::result::Result;

use cube_common::{
    apptime::AppTime,
    config::{CubeConfig, OPENGL_WINDOW_TITLE, WINDOW_HEIGHT, WINDOW_WIDTH},
    rotation::CubeRotation,
};
use glutin::{
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
};
use log::{error, info};

/// Opens the window and draws the rotating cube until it is closed.
///
/// Only returns when setup fails. Once the event loop runs it owns the process: a clean close
/// exits with status 0, and the first error while drawing is logged and exits with status 1.
pub fn run() -> Result<()> {
    let config = CubeConfig::new()?;
    let event_loop = EventLoop::new();
    let windowed_context =
        create_windowed_context(OPENGL_WINDOW_TITLE, WINDOW_WIDTH, WINDOW_HEIGHT, &event_loop)?;

    let size = windowed_context.window().inner_size();
    let mut renderer = Some(unsafe { GlRenderer::new(&config, size.width, size.height)? });
    let mut apptime = AppTime::new();
    let mut rotation = CubeRotation::new();
    let mut failed = false;

    event_loop.run(move |event, _, control_flow| {
        let gl_renderer = match renderer.as_ref() {
            Some(gl_renderer) => gl_renderer,
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
                    windowed_context.resize(size);
                    if let Err(resize_error) = unsafe { gl_renderer.resize(size.width, size.height) } {
                        error!("Failed to resize viewport: {}", resize_error);
                        failed = true;
                        *control_flow = ControlFlow::Exit;
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared => windowed_context.window().request_redraw(),
            Event::RedrawRequested(_) => {
                apptime.update();
                rotation.advance(apptime.delta_seconds());

                let size = windowed_context.window().inner_size();
                unsafe { gl_renderer.draw(size.width, size.height, &rotation) };
                if let Err(swap_error) = windowed_context.swap_buffers() {
                    error!("Failed to swap buffers on frame {}: {}", apptime.frame, swap_error);
                    failed = true;
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::LoopDestroyed => {
                info!("Leaving main loop after {} frames", apptime.frame);
                // GL objects go while the context is still current
                renderer = None;
                if failed {
                    std::process::exit(1);
                }
            }
            _ => {}
        }
    })
}
