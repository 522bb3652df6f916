use std::{ffi::OsString, io};

use crate::propagate;
use image::ImageError;
use thiserror::Error;
//////////////////////// Types ///////////////////////
pub type Result<T> = std::result::Result<T, CubeCommonError>;
//////////////////////// Enums ///////////////////////
#[derive(Error, Debug)]
pub enum CubeCommonError {
    #[error("Failed to get base directory from executable")]
    ExecutableBaseDirError,
    #[error(transparent)]
    ImageLoadError(ImageError),
    #[error(transparent)]
    IoError(io::Error),
    #[error("Resource {resource:?} not found, tried {tried:?}")]
    ResourceFailedToResolve {
        resource: OsString,
        tried: Vec<OsString>,
    },
    #[error("Texture {0:?} has no pixels")]
    EmptyTexture(OsString),
}
//////////////////////// Impls ///////////////////////
propagate!(CubeCommonError, IoError as io::Error, using_panic_feature);
propagate!(CubeCommonError, ImageLoadError as ImageError, using_panic_feature);
