use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{
    build_hacks::get_target_from_out_dir, resource_bundle::ResourceBundle,
    shader_compilation::ShaderCompileParams,
};

/// Entry point for a binary crate's `build.rs`: copies `<crate>/<resource_folder_name>` next to the
/// binaries and compiles its GLSL shaders to SPIR-V there. A shader that fails to compile only warns
/// so that the backends which do not need SPIR-V still build.
pub fn process_cube_app_resources(resource_folder_name: &str) -> Result<(), String> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(|e| e.to_string())?;
    let resource_bundle = ResourceBundle::new(PathBuf::from(manifest_dir).join(resource_folder_name));

    let out_dir = env::var_os("OUT_DIR").ok_or("OUT_DIR is not set")?;
    let target_dir = get_target_from_out_dir(Path::new(&out_dir).to_owned())
        .ok_or_else(|| format!("Cannot find target dir above {:?}", out_dir))?;

    resource_bundle
        .copy_bundle_to_location(&target_dir)
        .map_err(|e| format!("Failed to copy resources to {}: {}", target_dir.display(), e))?;

    let shader_compile_params =
        ShaderCompileParams::new(&resource_bundle.resource_dir_path, &target_dir)
            .map_err(|e| e.to_string())?;
    let shader_srcs = shader_compile_params
        .collect_shader_srcs()
        .map_err(|e| e.to_string())?;

    for shader_src in shader_srcs {
        if let Err(error) = shader_src.compile(&shader_compile_params) {
            println!("cargo:warning={}", error);
        }
    }
    Ok(())
}
