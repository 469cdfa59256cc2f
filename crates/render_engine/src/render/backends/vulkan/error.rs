//! Vulkan-specific error types

use ash::vk;
use thiserror::Error;

use crate::render::RenderError;

/// Vulkan-specific error types
#[derive(Error, Debug)]
pub enum VulkanError {
    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// Vulkan context initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// A requested instance layer is not available on this system
    #[error("Required layer not available: {0}")]
    MissingValidationLayer(String),

    /// No physical device satisfied the device requirements
    #[error("No suitable GPU found")]
    NoSuitableDevice,

    /// No suitable memory type found for allocation
    #[error("No suitable memory type found")]
    NoSuitableMemoryType,

    /// No depth format with depth/stencil attachment support was found
    #[error("No supported depth format found")]
    NoSupportedDepthFormat,

    /// Operation called while the backend is in the wrong lifecycle state
    #[error("Invalid backend state: {0}")]
    InvalidState(&'static str),
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;

impl From<VulkanError> for RenderError {
    fn from(err: VulkanError) -> Self {
        match err {
            VulkanError::InvalidState(what) => RenderError::InvalidState(what),
            other => RenderError::Frame(other.to_string()),
        }
    }
}
