use cube_common::{propagate, result::CubeCommonError};
use glutin::{ContextError, CreationError};
use std::{ffi::NulError, num::TryFromIntError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpenGlError>;

#[derive(Error, Debug)]
pub enum OpenGlError {
    // shaders
    #[error("Failed to compile {stage} shader: {log}")]
    ShaderCompileFailed { stage: &'static str, log: String },
    #[error("Failed to link shader program: {0}")]
    ProgramLinkFailed(String),
    #[error("Shader program has no active uniform named {0}")]
    UniformNotFound(String),
    // resources
    #[error("Failed to generate GL object: {0}")]
    ObjectCreateFailed(&'static str),
    // propagating common errors
    #[error(transparent)]
    CubeCommonError(CubeCommonError),
    // context
    #[error(transparent)]
    ContextCreateFailure(CreationError),
    #[error(transparent)]
    ContextFailure(ContextError),
    // fallback errors
    #[error(transparent)]
    OpenGlNulError(NulError),
    #[error(transparent)]
    OpenGlIntConversionError(TryFromIntError),
}

propagate!(
    OpenGlError,
    CubeCommonError as CubeCommonError,
    using_panic_feature
);
propagate!(
    OpenGlError,
    ContextCreateFailure as CreationError,
    using_panic_feature
);
propagate!(OpenGlError, ContextFailure as ContextError, using_panic_feature);
propagate!(OpenGlError, OpenGlNulError as NulError, using_panic_feature);
propagate!(
    OpenGlError,
    OpenGlIntConversionError as TryFromIntError,
    using_panic_feature
);
