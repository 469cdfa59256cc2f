//! Vulkan backend implementation
//!
//! Module layout follows the object graph: `instance` and `surface`
//! are created first, `device` selects and opens the GPU, `swapchain`
//! and `image` manage presentable resources, and `backend` composes
//! them behind the [`crate::render::api::RenderBackend`] trait.

pub mod backend;
pub mod device;
pub mod error;
pub mod image;
pub mod instance;
pub mod surface;
pub mod swapchain;

pub use backend::VulkanBackend;
pub use error::{VulkanError, VulkanResult};
pub use swapchain::{AcquireAction, PresentAction, MAX_FRAMES_IN_FLIGHT};
