use crate::util::result::{Result, VulkanError};

use ash::version::DeviceV1_0;
use ash::vk;
use log::debug;
use std::fs::File;
use std::path::Path;

pub fn create_shader_module(
    file_name: &Path,
    logical_device: &ash::Device,
) -> Result<vk::ShaderModule> {
    // the SPIR-V words can be freed right after the shader module has been created
    let code = read_shader_file(file_name)?;
    debug!("Loaded {} SPIR-V words from {:?}", code.len(), file_name);

    let shader_module_create_info = vk::ShaderModuleCreateInfo::builder().code(&code);

    let shader_module =
        unsafe { logical_device.create_shader_module(&shader_module_create_info, None)? };

    Ok(shader_module)
}

/// Reads the file as aligned u32 words, rejecting sizes that are not a multiple of 4.
fn read_shader_file(file_name: &Path) -> Result<Vec<u32>> {
    let to_error = |source| VulkanError::ShaderFileReadFailure {
        source,
        shader_file: file_name.as_os_str().to_owned(),
    };

    let mut file = File::open(file_name).map_err(to_error)?;
    ash::util::read_spv(&mut file).map_err(to_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_shader_reports_the_file() {
        let missing = Path::new("definitely/not/here/cube.vert.spv");
        match read_shader_file(missing) {
            Err(VulkanError::ShaderFileReadFailure { shader_file, .. }) => {
                assert_eq!(shader_file, missing.as_os_str())
            }
            _ => panic!("expected a shader read failure"),
        }
    }

    #[test]
    fn reads_spirv_words() {
        let path = std::env::temp_dir().join(format!("cube_shader_{}.spv", std::process::id()));
        let magic: u32 = 0x0723_0203;
        let mut bytes = magic.to_le_bytes().to_vec();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        fs::write(&path, &bytes).unwrap();

        let words = read_shader_file(&path).unwrap();
        assert_eq!(words, vec![magic, 1]);
        fs::remove_file(&path).unwrap();
    }
}
