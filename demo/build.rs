use cube_build_utils::tools::process_cube_app_resources;

fn main() {
    println!("cargo:rerun-if-changed=resources");
    if let Err(error) = process_cube_app_resources("resources") {
        println!("cargo:warning={}", error);
    }
}
