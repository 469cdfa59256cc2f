//! Windowing collaborator contract
//!
//! The rendering core does not own a window. It only needs a native
//! drawable surface target and the current framebuffer size; everything
//! else (event pumping, window lifecycle, input) belongs to the
//! platform layer that implements this trait.

use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle};

/// Surface target supplied by the windowing/platform layer
///
/// The raw window/display handles are used to create the presentable
/// surface and to derive the platform's required presentation
/// extensions. `framebuffer_size` is consulted whenever the swapchain
/// needs a target extent and the surface reports no fixed one.
pub trait RenderSurface: HasRawWindowHandle + HasRawDisplayHandle {
    /// Current framebuffer size in pixels (drawable area, not window size)
    fn framebuffer_size(&self) -> (u32, u32);
}
