use std::{ffi::OsStr, path::PathBuf};
//////////////////////// Fns ///////////////////////
fn is_build_dir(dir_name: Option<&OsStr>) -> bool {
    match dir_name {
        Some(dir_name) => dir_name == "build",
        None => false,
    }
}

/// Walks up from `OUT_DIR` (`target/<profile>/build/<crate>-<hash>/out`) to `target/<profile>`,
/// which is where the binaries end up. Only sensible from a binary crate's build script.
pub fn get_target_from_out_dir(mut out_dir: PathBuf) -> Option<PathBuf> {
    while !is_build_dir(out_dir.file_name()) {
        if !out_dir.pop() {
            return None;
        }
    }
    // remove /build
    if !out_dir.pop() {
        return None;
    }
    Some(out_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn strips_build_and_everything_below() {
        let out_dir = Path::new("/work/target/debug/build/demo-1234abcd/out").to_owned();
        assert_eq!(
            get_target_from_out_dir(out_dir),
            Some(Path::new("/work/target/debug").to_owned())
        );
    }

    #[test]
    fn no_build_component_gives_none() {
        let out_dir = Path::new("/work/target/debug/out").to_owned();
        assert_eq!(get_target_from_out_dir(out_dir), None);
    }
}
