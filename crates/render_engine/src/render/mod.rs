//! Rendering system
//!
//! The application-facing surface is [`Renderer`]: construct it with a
//! [`RendererConfig`] and a windowing collaborator, feed it a
//! [`RenderPacket`] per frame, and notify it of resizes. Backend
//! selection and all graphics-API detail stay behind the
//! [`api::RenderBackend`] trait.

pub mod api;
pub mod backends;
pub mod window;

use thiserror::Error;

use crate::render::api::{BackendKind, RenderBackend, RenderPacket, RendererConfig};
use crate::render::window::RenderSurface;

/// Errors surfaced by the rendering system
#[derive(Error, Debug)]
pub enum RenderError {
    /// Backend construction failed
    #[error("renderer initialization failed: {0}")]
    Initialization(String),

    /// A frame operation failed
    #[error("frame error: {0}")]
    Frame(String),

    /// An operation was called in the wrong lifecycle state
    #[error("invalid renderer state: {0}")]
    InvalidState(&'static str),
}

/// High-level renderer facade over the active backend
///
/// Owns the backend for its whole lifetime. Frames are driven one at a
/// time from a single thread; `shutdown` (or dropping the renderer)
/// ends the lifecycle.
pub struct Renderer {
    backend: Box<dyn RenderBackend>,
}

impl Renderer {
    /// Create a renderer with the given backend kind
    pub fn new<W>(
        kind: BackendKind,
        config: &RendererConfig,
        window: &W,
    ) -> Result<Self, RenderError>
    where
        W: RenderSurface + ?Sized,
    {
        let backend = backends::create_backend(kind, config, window)?;
        Ok(Self { backend })
    }

    /// Draw one frame described by the packet
    ///
    /// Begins and ends a backend frame; frame recording between the
    /// two belongs to higher layers.
    pub fn draw_frame(&mut self, packet: &RenderPacket) -> Result<(), RenderError> {
        self.backend.begin_frame(packet.delta_time)?;
        self.backend.end_frame(packet.delta_time)?;
        Ok(())
    }

    /// Notify the renderer of a framebuffer resize
    ///
    /// Takes effect at the start of the next frame.
    pub fn resized(&mut self, width: u32, height: u32) {
        self.backend.resized(width, height);
    }

    /// Frames completed since initialization
    pub fn frame_number(&self) -> u64 {
        self.backend.frame_number()
    }

    /// Current swapchain extent (width, height)
    pub fn swapchain_extent(&self) -> (u32, u32) {
        self.backend.swapchain_extent()
    }

    /// Shut the renderer down; further draws fail with `InvalidState`
    pub fn shutdown(&mut self) {
        self.backend.shutdown();
    }
}
