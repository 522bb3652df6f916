use cube_common::{propagate, result::CubeCommonError};
use std::num::TryFromIntError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, D3D11Error>;

#[derive(Error, Debug)]
pub enum D3D11Error {
    #[error("Direct3D 11 is only available on Windows, this build targets {0}")]
    Unsupported(&'static str),
    // device
    #[error("No hardware adapter found among {0} enumerated adapters")]
    NoHardwareAdapter(usize),
    #[error("Device call succeeded but returned no {0}")]
    MissingObject(&'static str),
    // shaders
    #[error("Failed to compile {stage} shader: {message}")]
    ShaderCompileFailed {
        stage: &'static str,
        message: String,
    },
    // window
    #[error("Failed to create window: {0}")]
    WindowCreateFailure(String),
    // propagating common errors
    #[error(transparent)]
    CubeCommonError(CubeCommonError),
    #[cfg(target_os = "windows")]
    #[error(transparent)]
    WindowsError(windows::core::Error),
    // fallback errors
    #[error(transparent)]
    D3D11IntConversionError(TryFromIntError),
}

propagate!(
    D3D11Error,
    CubeCommonError as CubeCommonError,
    using_panic_feature
);
#[cfg(target_os = "windows")]
propagate!(
    D3D11Error,
    WindowsError as windows::core::Error,
    using_panic_feature
);
propagate!(
    D3D11Error,
    D3D11IntConversionError as TryFromIntError,
    using_panic_feature
);
