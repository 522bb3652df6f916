use log::{error, info};

fn main() {
    env_logger::init();
    info!("Starting OpenGL cube");
    if let Err(error) = cube_opengl_backend::run() {
        error!("OpenGL cube failed: {}", error);
        std::process::exit(1);
    }
}
