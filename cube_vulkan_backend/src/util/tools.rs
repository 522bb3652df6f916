use crate::util::result::Result;

use std::ffi::CStr;
use std::os::raw::c_char;

/// Vulkan hands back names as fixed size, nul terminated char arrays.
pub fn vk_to_string(raw_string_array: &[c_char]) -> Result<String> {
    let raw_string = unsafe { CStr::from_ptr(raw_string_array.as_ptr()) };
    Ok(raw_string.to_str()?.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_first_nul() {
        let mut raw = [0 as c_char; 16];
        for (i, b) in b"VK_KHR".iter().enumerate() {
            raw[i] = *b as c_char;
        }
        raw[8] = b'x' as c_char;
        assert_eq!(vk_to_string(&raw).unwrap(), "VK_KHR");
    }
}
