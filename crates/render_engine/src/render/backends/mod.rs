//! Rendering backend implementations
//!
//! Concrete backends live here; the rest of the crate only sees them
//! through [`RenderBackend`] and the [`create_backend`] factory.

pub mod vulkan;

use crate::render::api::{BackendKind, BackendResult, RenderBackend, RendererConfig};
use crate::render::window::RenderSurface;
use crate::render::RenderError;

/// Construct the backend selected by `kind`
///
/// The single construction entry point; callers hold the result as a
/// boxed trait object and never name a concrete backend type.
pub fn create_backend<W>(
    kind: BackendKind,
    config: &RendererConfig,
    window: &W,
) -> BackendResult<Box<dyn RenderBackend>>
where
    W: RenderSurface + ?Sized,
{
    match kind {
        BackendKind::Vulkan => {
            let backend = vulkan::VulkanBackend::new(config, window)
                .map_err(|e| RenderError::Initialization(e.to_string()))?;
            Ok(Box::new(backend))
        }
        BackendKind::OpenGl => Err(RenderError::Initialization(
            "OpenGL backend is not implemented".to_string(),
        )),
        BackendKind::DirectX => Err(RenderError::Initialization(
            "DirectX backend is not implemented".to_string(),
        )),
    }
}
