use crate::result::{CubeCommonError, Result};
use log::info;
use std::{
    env,
    path::{Path, PathBuf},
};
//////////////////////// Consts ///////////////////////
pub const WINDOW_WIDTH: u32 = 1600;
pub const WINDOW_HEIGHT: u32 = 900;

pub const VULKAN_WINDOW_TITLE: &str = "Vulkan Cube";
pub const OPENGL_WINDOW_TITLE: &str = "OpenGL Cube";
pub const D3D11_WINDOW_TITLE: &str = "Direct3D 11 Cube";

/// Background behind the cube.
pub const CLEAR_COLOR: [f32; 4] = [99.0 / 255.0, 139.0 / 255.0, 235.0 / 255.0, 1.0];

pub const TEXTURE_PATH: &str = "assets/texture.png";
pub const VERTEX_SHADER_SPV_PATH: &str = "shaders/spv/cube.vert.spv";
pub const FRAGMENT_SHADER_SPV_PATH: &str = "shaders/spv/cube.frag.spv";
//////////////////////// Structs ///////////////////////
/// Finds the resources (texture, compiled shaders) that the build script copies next to the binary.
/// Running through `cargo run` from the crate folder also works because the working directory is searched second.
pub struct CubeConfig {
    search_roots: Vec<PathBuf>,
}
//////////////////////// Impls ///////////////////////
impl CubeConfig {
    pub fn new() -> Result<Self> {
        let current_exe = env::current_exe()?;
        let exe_dir = current_exe
            .parent()
            .ok_or(CubeCommonError::ExecutableBaseDirError)?
            .to_owned();
        let mut search_roots = vec![exe_dir];
        if let Ok(cwd) = env::current_dir() {
            search_roots.push(cwd);
        }
        info!("Cube config will search resources under {:?}", search_roots);
        Ok(Self { search_roots })
    }

    pub fn with_search_roots(search_roots: Vec<PathBuf>) -> Self {
        Self { search_roots }
    }

    pub fn resolve_resource<P>(&self, resource_file_name: P) -> Result<PathBuf>
    where
        P: AsRef<Path>,
    {
        let resource_file_name = resource_file_name.as_ref();
        let candidates: Vec<PathBuf> = self
            .search_roots
            .iter()
            .map(|root| root.join(resource_file_name))
            .collect();

        match candidates.iter().find(|candidate| candidate.exists()) {
            Some(resolved) => Ok(resolved.clone()),
            None => Err(CubeCommonError::ResourceFailedToResolve {
                resource: resource_file_name.as_os_str().to_owned(),
                tried: candidates.into_iter().map(PathBuf::into_os_string).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("cube_common_config_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn resolves_against_first_root_that_has_the_file() {
        let first = scratch_dir("first");
        let second = scratch_dir("second");
        fs::create_dir_all(second.join("assets")).unwrap();
        fs::write(second.join("assets/texture.png"), b"x").unwrap();

        let config = CubeConfig::with_search_roots(vec![first.clone(), second.clone()]);
        let resolved = config.resolve_resource(TEXTURE_PATH).unwrap();
        assert_eq!(resolved, second.join(TEXTURE_PATH));

        fs::create_dir_all(first.join("assets")).unwrap();
        fs::write(first.join("assets/texture.png"), b"y").unwrap();
        let resolved = config.resolve_resource(TEXTURE_PATH).unwrap();
        assert_eq!(resolved, first.join(TEXTURE_PATH));

        fs::remove_dir_all(first).unwrap();
        fs::remove_dir_all(second).unwrap();
    }

    #[test]
    fn missing_resource_lists_every_candidate() {
        let root = scratch_dir("missing");
        let config = CubeConfig::with_search_roots(vec![root.clone()]);
        match config.resolve_resource("nope.spv") {
            Err(CubeCommonError::ResourceFailedToResolve { resource, tried }) => {
                assert_eq!(resource, "nope.spv");
                assert_eq!(tried, vec![root.join("nope.spv").into_os_string()]);
            }
            other => panic!("expected resolve failure, got {:?}", other),
        }
        fs::remove_dir_all(root).unwrap();
    }
}
