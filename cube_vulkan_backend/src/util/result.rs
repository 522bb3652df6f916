use ash::{vk, InstanceError, LoadingError};
use cube_common::{propagate, result::CubeCommonError};
use std::{ffi::NulError, ffi::OsString, num::TryFromIntError, str::Utf8Error};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VulkanError>;

#[derive(Error, Debug)]
pub enum VulkanError {
    #[error("Failed to find command buffer with index: {0}")]
    CommandBufferNotAvailable(usize),
    #[error("Cube vertices and texture have to be uploaded before the swap chain resources")]
    CubeNotLoaded,
    // depth
    #[error("Failed to find supported depth format")]
    DepthFailedToFindSupportedFormat,
    // descriptors
    #[error("Incorrect number of descriptors sets: {0}")]
    DescriptorSetNotAvailable(usize),
    #[error("Image layout transition not supported: {0}")]
    ImageLayoutTransitionNotSupported(String),
    // memory
    #[error("Failed to find suitable memory type")]
    MemoryFailedToFindType,
    #[error("Failed to map memory of {0} bytes")]
    MemoryMapFailed(vk::DeviceSize),
    // propagating common errors
    #[error(transparent)]
    CubeCommonError(CubeCommonError),
    #[error("Failed to create physical device. No GPU with supported functions")]
    PhysicalDeviceNoGpu,
    // queues
    #[error("No queue family supports graphics and present")]
    QueueCreationFailed,
    // pipeline
    #[error("Failed to create graphics pipeline")]
    PipelineCreateError,
    // validation
    #[error("Validation layer {0} is not available")]
    RequiredValidationLayersUnsupported(String),
    // shaders
    #[error("Failed to read shader: {shader_file:?}. Reason: {source:?}")]
    ShaderFileReadFailure {
        source: std::io::Error,
        shader_file: OsString,
    },
    // swap chain errors
    #[error("Surface reports no formats")]
    SwapChainFormatsError,
    #[error("Swap chain image {0} is out of range")]
    SwapChainImageOutOfRange(u32),
    // uniform buffer errors
    #[error("No uniform buffer for swap chain image with index {0}")]
    UniformBufferNotAvailable(usize),
    // window
    #[error("Failed to create a window: {0}")]
    WindowCreateFailure(String),
    #[error("The platform surface stored in window is incorrect")]
    WindowIncorrectPlatformSurface,
    // fallback errors
    #[error(transparent)]
    AshInstanceError(InstanceError),
    #[error(transparent)]
    AshLoadingError(LoadingError),
    #[error(transparent)]
    OtherVkResult(vk::Result),
    #[error(transparent)]
    VulkanNulError(NulError),
    #[error(transparent)]
    VulkanStringConversionError(Utf8Error),
    #[error(transparent)]
    VulkanUsizeConversionError(TryFromIntError),
}

propagate!(
    VulkanError,
    AshInstanceError as InstanceError,
    using_panic_feature
);
propagate!(
    VulkanError,
    AshLoadingError as LoadingError,
    using_panic_feature
);
propagate!(
    VulkanError,
    OtherVkResult as vk::Result,
    using_panic_feature
);
propagate!(VulkanError, VulkanNulError as NulError, using_panic_feature);
propagate!(
    VulkanError,
    VulkanStringConversionError as Utf8Error,
    using_panic_feature
);
propagate!(
    VulkanError,
    VulkanUsizeConversionError as TryFromIntError,
    using_panic_feature
);
propagate!(
    VulkanError,
    CubeCommonError as CubeCommonError,
    using_panic_feature
);
