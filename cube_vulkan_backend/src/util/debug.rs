use crate::util::result::Result;
use crate::util::validation::VulkanValidation;

use ash::vk;
use log::{log, Level};
use std::ffi::CStr;
use std::os::raw::c_void;
use std::ptr;

/// Maps a validation message severity onto the `log` level it is reported at.
pub fn log_level_for(message_severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> Level {
    if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        Level::Error
    } else if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        Level::Warn
    } else if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        Level::Debug
    } else {
        Level::Trace
    }
}

fn message_type_tag(message_type: vk::DebugUtilsMessageTypeFlagsEXT) -> &'static str {
    match message_type {
        vk::DebugUtilsMessageTypeFlagsEXT::GENERAL => "[General]",
        vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE => "[Performance]",
        vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION => "[Validation]",
        _ => "[Unknown]",
    }
}

/// the callback function used in Debug Utils.
unsafe extern "system" fn vulkan_debug_utils_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _p_user_data: *mut c_void,
) -> vk::Bool32 {
    if p_callback_data.is_null() || (*p_callback_data).p_message.is_null() {
        return vk::FALSE;
    }
    let message = CStr::from_ptr((*p_callback_data).p_message);
    log!(
        log_level_for(message_severity),
        "{}{}",
        message_type_tag(message_type),
        message.to_string_lossy()
    );

    vk::FALSE
}

pub struct VulkanDebug {
    debug_utils: ash::extensions::ext::DebugUtils,
    debug_messenger: Option<vk::DebugUtilsMessengerEXT>,
}

impl VulkanDebug {
    pub fn new(
        entry: &ash::Entry,
        instance: &ash::Instance,
        validation: &VulkanValidation,
    ) -> Result<Self> {
        let debug_utils = ash::extensions::ext::DebugUtils::new(entry, instance);

        let debug_messenger = if validation.is_enabled {
            let create_info = Self::populate_debug_create_info();
            Some(unsafe { debug_utils.create_debug_utils_messenger(&create_info, None)? })
        } else {
            None
        };
        Ok(Self {
            debug_utils,
            debug_messenger,
        })
    }

    pub unsafe fn destroy_debug_messenger(&mut self) {
        if let Some(debug_messenger) = self.debug_messenger.take() {
            self.debug_utils
                .destroy_debug_utils_messenger(debug_messenger, None);
        }
    }

    /// Chained into the instance create info so that instance creation and destruction are reported too.
    /// The caller keeps the returned struct alive until `create_instance` returns.
    pub fn instance_debug_create_info(
        validation: &VulkanValidation,
    ) -> Option<vk::DebugUtilsMessengerCreateInfoEXT> {
        if validation.is_enabled {
            Some(Self::populate_debug_create_info())
        } else {
            None
        }
    }

    fn populate_debug_create_info() -> vk::DebugUtilsMessengerCreateInfoEXT {
        vk::DebugUtilsMessengerCreateInfoEXT {
            s_type: vk::StructureType::DEBUG_UTILS_MESSENGER_CREATE_INFO_EXT,
            p_next: ptr::null(),
            flags: vk::DebugUtilsMessengerCreateFlagsEXT::empty(),
            message_severity: vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            message_type: vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
            pfn_user_callback: Some(vulkan_debug_utils_callback),
            p_user_data: ptr::null_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_map_to_log_levels() {
        type Sev = vk::DebugUtilsMessageSeverityFlagsEXT;
        assert_eq!(log_level_for(Sev::ERROR), Level::Error);
        assert_eq!(log_level_for(Sev::WARNING), Level::Warn);
        assert_eq!(log_level_for(Sev::INFO), Level::Debug);
        assert_eq!(log_level_for(Sev::VERBOSE), Level::Trace);
        assert_eq!(log_level_for(Sev::WARNING | Sev::ERROR), Level::Error);
    }

    #[test]
    fn disabled_validation_chains_nothing() {
        let disabled = VulkanValidation::disabled();
        assert!(VulkanDebug::instance_debug_create_info(&disabled).is_none());
        let enabled = VulkanValidation::enabled(crate::util::validation::ValidationOptions::None);
        let info = VulkanDebug::instance_debug_create_info(&enabled).unwrap();
        assert!(info.pfn_user_callback.is_some());
    }
}
