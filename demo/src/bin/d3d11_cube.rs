use log::{error, info};

fn main() {
    env_logger::init();
    info!("Starting Direct3D 11 cube");
    if let Err(error) = cube_d3d11_backend::run() {
        error!("Direct3D 11 cube failed: {}", error);
        std::process::exit(1);
    }
}
