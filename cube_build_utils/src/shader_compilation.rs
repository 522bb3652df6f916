use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Represents a GLSL shader source file in the filesystem.
pub struct ShaderSource {
    shader_path: PathBuf,
}

impl ShaderSource {
    pub fn new(shader_path: PathBuf) -> Self {
        Self { shader_path }
    }

    /// `cube.vert` compiles to `cube.vert.spv` so both stages of one shader can share a stem.
    pub fn compiled_file_name(&self, output_dir: &Path) -> Result<PathBuf, String> {
        let file_name = self
            .shader_path
            .file_name()
            .ok_or_else(|| format!("No file name in {}", self.shader_path.display()))?;
        let mut compiled_name = file_name.to_owned();
        compiled_name.push(".spv");
        Ok(output_dir.join(compiled_name))
    }

    /// Compile the GLSL shader into SPIR-V with `glslc`.
    /// Also emits a cargo:rerun-if-changed for the source so edits trigger a rebuild.
    pub fn compile(&self, params: &ShaderCompileParams) -> Result<(), String> {
        println!("cargo:rerun-if-changed={}", self.shader_path.display());

        let compiled_file_name = self.compiled_file_name(&params.output_dir)?;
        let args = [
            self.shader_path.as_os_str(),
            OsStr::new("-o"),
            compiled_file_name.as_os_str(),
        ];

        let command_executable = if cfg!(target_os = "windows") {
            "glslc.exe"
        } else {
            "glslc"
        };
        let output = Command::new(command_executable)
            .args(&args)
            .output()
            .map_err(|error| format!("Error running {}: {}", command_executable, error))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(format!(
                "Shader compile error in {}: {}",
                self.shader_path.display(),
                String::from_utf8_lossy(&output.stderr)
            ))
        }
    }
}

/// Where GLSL sources are read from and where the SPIR-V lands.
pub struct ShaderCompileParams {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl ShaderCompileParams {
    pub const SHADERS_SRC: &'static str = "shaders/src";
    pub const SHADERS_SPV: &'static str = "shaders/spv";

    /// Sources under `<resource_dir>/shaders/src`, output to `<target_dir>/shaders/spv`.
    pub fn new(resource_dir: &Path, target_dir: &Path) -> io::Result<Self> {
        let input_dir = resource_dir.join(Self::SHADERS_SRC);
        let output_dir = target_dir.join(Self::SHADERS_SPV);
        fs::create_dir_all(&output_dir)?;

        // new files in the source folder should also rerun the build script
        println!("cargo:rerun-if-changed={}", input_dir.display());
        Ok(Self {
            input_dir,
            output_dir,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Locate all vertex and fragment GLSL shaders.
    pub fn collect_shader_srcs(&self) -> io::Result<Vec<ShaderSource>> {
        let mut result = Vec::new();
        if self.input_dir.is_dir() {
            for entry in fs::read_dir(&self.input_dir)? {
                let path = entry?.path();
                let is_stage = path
                    .extension()
                    .map_or(false, |ext| ext == "vert" || ext == "frag");
                if path.is_file() && is_stage {
                    result.push(ShaderSource::new(path));
                }
            }
        }
        result.sort_by(|a, b| a.shader_path.cmp(&b.shader_path));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn compiled_name_keeps_stage_extension() {
        let source = ShaderSource::new(PathBuf::from("shaders/src/cube.frag"));
        assert_eq!(
            source.compiled_file_name(Path::new("out")).unwrap(),
            PathBuf::from("out/cube.frag.spv")
        );
    }

    #[test]
    fn only_vertex_and_fragment_sources_are_collected() {
        let root = env::temp_dir().join(format!("cube_shaders_{}", std::process::id()));
        let src = root.join("res").join(ShaderCompileParams::SHADERS_SRC);
        fs::create_dir_all(&src).unwrap();
        for name in &["cube.vert", "cube.frag", "notes.txt", "cube.comp"] {
            fs::write(src.join(name), b"").unwrap();
        }

        let params = ShaderCompileParams::new(&root.join("res"), &root.join("target")).unwrap();
        let names: Vec<String> = params
            .collect_shader_srcs()
            .unwrap()
            .iter()
            .map(|s| s.shader_path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["cube.frag", "cube.vert"]);
        assert!(params.output_dir().is_dir());
        fs::remove_dir_all(root).unwrap();
    }
}
