//! Backend abstraction trait for the rendering system
//!
//! This module defines the trait that rendering backends must implement
//! to provide a consistent lifecycle for the high-level renderer. The
//! concrete backend is chosen once at initialization via [`BackendKind`];
//! callers drive frames without knowing which backend is active.

use crate::render::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Available rendering backend implementations
///
/// Only Vulkan is implemented today; the other kinds exist so the
/// selection point stays a data decision rather than a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Vulkan backend
    Vulkan,
    /// OpenGL backend (not yet implemented)
    OpenGl,
    /// DirectX backend (not yet implemented)
    DirectX,
}

/// Main rendering backend trait
///
/// A backend is constructed in the Ready state and sequenced as
/// `begin_frame` -> (external frame recording) -> `end_frame`, once per
/// frame, from a single thread. `resized` may be called between frames;
/// the new extent takes effect on the next `begin_frame`.
pub trait RenderBackend {
    /// Begin a frame; applies any pending resize before the frame starts
    fn begin_frame(&mut self, delta_time: f32) -> BackendResult<()>;

    /// End the current frame and advance the frame counter
    fn end_frame(&mut self, delta_time: f32) -> BackendResult<()>;

    /// Record a new framebuffer extent; takes effect on the next frame
    fn resized(&mut self, width: u32, height: u32);

    /// Number of frames completed since initialization
    fn frame_number(&self) -> u64;

    /// Current swapchain extent (width, height)
    fn swapchain_extent(&self) -> (u32, u32);

    /// Tear down the backend; all further frame calls fail
    fn shutdown(&mut self);
}
