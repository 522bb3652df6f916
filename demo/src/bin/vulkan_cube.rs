use log::{error, info};

fn main() {
    env_logger::init();
    info!("Starting Vulkan cube");
    if let Err(error) = cube_vulkan_backend::run() {
        error!("Vulkan cube failed: {}", error);
        std::process::exit(1);
    }
}
