use std::{
    fs,
    io::Result,
    path::{Path, PathBuf},
};

/// A folder of runtime resources (textures, shader sources) that has to sit next to the executable,
/// since the binaries look resources up relative to their own location.
pub struct ResourceBundle {
    pub resource_dir_path: PathBuf,
}

impl ResourceBundle {
    pub fn new(resource_dir_path: PathBuf) -> Self {
        println!("cargo:rerun-if-changed={}", resource_dir_path.display());
        Self { resource_dir_path }
    }

    /// Mirrors the bundle's contents into `target_dir`, creating folders as needed.
    pub fn copy_bundle_to_location(&self, target_dir: &Path) -> Result<()> {
        let mut accumulated_path = target_dir.to_owned();
        fs::create_dir_all(&accumulated_path)?;
        Self::copy_recursive(&self.resource_dir_path, &mut accumulated_path)
    }

    fn copy_recursive(source_path: &Path, accumulated_path: &mut PathBuf) -> Result<()> {
        for entry in fs::read_dir(source_path)? {
            let path = entry?.path();
            if let Some(name) = path.file_name() {
                accumulated_path.push(name);
                if path.is_dir() {
                    fs::create_dir_all(accumulated_path.as_path())?;
                    Self::copy_recursive(&path, accumulated_path)?;
                } else {
                    fs::copy(&path, accumulated_path.as_path())?;
                }
                accumulated_path.pop();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn copies_nested_files() {
        let root = env::temp_dir().join(format!("cube_bundle_{}", std::process::id()));
        let source = root.join("resources");
        let target = root.join("target");
        fs::create_dir_all(source.join("assets")).unwrap();
        fs::write(source.join("assets/texture.png"), b"png").unwrap();
        fs::write(source.join("readme"), b"top").unwrap();

        ResourceBundle::new(source)
            .copy_bundle_to_location(&target)
            .unwrap();

        assert_eq!(fs::read(target.join("assets/texture.png")).unwrap(), b"png");
        assert_eq!(fs::read(target.join("readme")).unwrap(), b"top");
        fs::remove_dir_all(root).unwrap();
    }
}
