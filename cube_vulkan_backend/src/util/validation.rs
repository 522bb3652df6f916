use crate::util::result::{Result, VulkanError};
use crate::util::tools::vk_to_string;

use log::{debug, info};

use ash::version::EntryV1_0;
use std::ffi::CString;
use std::os::raw::c_char;

pub enum ValidationOptions {
    None,
    Verbose,
}

pub struct VulkanValidation {
    pub is_enabled: bool,
    validation_layer_names: Vec<CString>,
    validation_layer_ptrs: Vec<*const c_char>,
    options: ValidationOptions,
}

impl VulkanValidation {
    pub const KHRONOS_VALIDATION: &'static str = "VK_LAYER_KHRONOS_validation";

    pub fn enabled(options: ValidationOptions) -> Self {
        // the literal contains no interior nul
        let validation_layer_names: Vec<CString> = CString::new(Self::KHRONOS_VALIDATION)
            .into_iter()
            .collect();
        let validation_layer_ptrs = validation_layer_names.iter().map(|n| n.as_ptr()).collect();
        Self {
            is_enabled: true,
            validation_layer_names,
            validation_layer_ptrs,
            options,
        }
    }

    pub fn disabled() -> Self {
        Self {
            is_enabled: false,
            validation_layer_names: Vec::new(),
            validation_layer_ptrs: Vec::new(),
            options: ValidationOptions::None,
        }
    }

    /// Validation in debug builds only.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::enabled(ValidationOptions::None)
        } else {
            Self::disabled()
        }
    }

    pub fn get_enabled_layer_count(&self) -> u32 {
        self.validation_layer_ptrs.len() as u32
    }

    pub fn get_enabled_layer_names(&self) -> *const *const c_char {
        self.validation_layer_ptrs.as_ptr()
    }

    pub fn check_validation_layer_support(&self, entry: &ash::Entry) -> Result<()> {
        if !self.is_enabled {
            return Ok(());
        }

        let layer_properties = entry.enumerate_instance_layer_properties()?;
        let available = layer_properties
            .iter()
            .map(|layer| vk_to_string(&layer.layer_name))
            .collect::<Result<Vec<String>>>()?;

        if let ValidationOptions::Verbose = self.options {
            info!("Available layers: {:?}", available);
        }

        for required in &self.validation_layer_names {
            let required = required.to_str()?;
            if !available.iter().any(|layer| layer == required) {
                return Err(VulkanError::RequiredValidationLayersUnsupported(
                    required.to_owned(),
                ));
            }
            debug!("Validation layer {} enabled", required);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn enabled_exposes_nul_terminated_khronos_layer() {
        let validation = VulkanValidation::enabled(ValidationOptions::None);
        assert_eq!(validation.get_enabled_layer_count(), 1);
        let first = unsafe { CStr::from_ptr(*validation.get_enabled_layer_names()) };
        assert_eq!(first.to_str().unwrap(), VulkanValidation::KHRONOS_VALIDATION);
    }

    #[test]
    fn disabled_has_no_layers() {
        assert_eq!(VulkanValidation::disabled().get_enabled_layer_count(), 0);
    }
}
