use gl::types::{GLchar, GLenum, GLsizei, GLuint};
use log::{log, Level};
use std::ffi::CStr;
use std::os::raw::c_void;

pub fn source_name(source: GLenum) -> &'static str {
    match source {
        gl::DEBUG_SOURCE_API => "API",
        gl::DEBUG_SOURCE_WINDOW_SYSTEM => "WINSYS",
        gl::DEBUG_SOURCE_SHADER_COMPILER => "SHADERCOMP",
        gl::DEBUG_SOURCE_THIRD_PARTY => "THIRDP",
        gl::DEBUG_SOURCE_APPLICATION => "APP",
        gl::DEBUG_SOURCE_OTHER => "OTHER",
        _ => "UNKNOWN",
    }
}

pub fn type_name(message_type: GLenum) -> &'static str {
    match message_type {
        gl::DEBUG_TYPE_ERROR => "ERROR",
        gl::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "DEPRECATED",
        gl::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "UNDEFINED",
        gl::DEBUG_TYPE_PORTABILITY => "PORTABILITY",
        gl::DEBUG_TYPE_PERFORMANCE => "PERF",
        gl::DEBUG_TYPE_MARKER => "MARKER",
        gl::DEBUG_TYPE_PUSH_GROUP => "PSHGRP",
        gl::DEBUG_TYPE_POP_GROUP => "POPGRP",
        gl::DEBUG_TYPE_OTHER => "OTHER",
        _ => "UNKNOWN",
    }
}

/// Errors always surface as `error!`, whatever severity the driver attached to them.
pub fn log_level_for(message_type: GLenum, severity: GLenum) -> Level {
    if message_type == gl::DEBUG_TYPE_ERROR {
        return Level::Error;
    }
    match severity {
        gl::DEBUG_SEVERITY_HIGH => Level::Error,
        gl::DEBUG_SEVERITY_MEDIUM => Level::Warn,
        gl::DEBUG_SEVERITY_LOW => Level::Info,
        _ => Level::Trace,
    }
}

extern "system" fn gl_debug_callback(
    source: GLenum,
    message_type: GLenum,
    _id: GLuint,
    severity: GLenum,
    _length: GLsizei,
    message: *const GLchar,
    _user_param: *mut c_void,
) {
    if message.is_null() {
        return;
    }
    let message = unsafe { CStr::from_ptr(message) };
    log!(
        log_level_for(message_type, severity),
        "[gl] [{}->{}] {}",
        source_name(source),
        type_name(message_type),
        message.to_string_lossy()
    );
}

/// Routes driver messages to `log`. Synchronous output keeps them on the thread that made the call.
///
/// # Safety
///
/// A context has to be current and its functions loaded.
pub unsafe fn enable_debug_output() {
    gl::Enable(gl::DEBUG_OUTPUT);
    gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
    gl::DebugMessageCallback(Some(gl_debug_callback), std::ptr::null());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_log_as_errors_regardless_of_severity() {
        assert_eq!(
            log_level_for(gl::DEBUG_TYPE_ERROR, gl::DEBUG_SEVERITY_NOTIFICATION),
            Level::Error
        );
        assert_eq!(
            log_level_for(gl::DEBUG_TYPE_PERFORMANCE, gl::DEBUG_SEVERITY_MEDIUM),
            Level::Warn
        );
        assert_eq!(
            log_level_for(gl::DEBUG_TYPE_OTHER, gl::DEBUG_SEVERITY_NOTIFICATION),
            Level::Trace
        );
    }

    #[test]
    fn names_for_known_and_unknown_enums() {
        assert_eq!(source_name(gl::DEBUG_SOURCE_SHADER_COMPILER), "SHADERCOMP");
        assert_eq!(type_name(gl::DEBUG_TYPE_POP_GROUP), "POPGRP");
        assert_eq!(source_name(0), "UNKNOWN");
        assert_eq!(type_name(0), "UNKNOWN");
    }
}
