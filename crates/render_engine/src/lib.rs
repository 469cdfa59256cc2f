//! # Render Engine
//!
//! A Vulkan rendering core focused on device selection and swapchain
//! lifecycle management.
//!
//! ## Features
//!
//! - **Device Selection**: Capability-driven GPU selection with
//!   queue-family role assignment
//! - **Swapchain Lifecycle**: Creation, resize-driven recreation, and
//!   acquire/present classification
//! - **Backend Abstraction**: Applications drive frames through a
//!   backend trait, never a graphics API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use render_engine::render::api::{BackendKind, RenderPacket, RendererConfig};
//! use render_engine::render::window::RenderSurface;
//! use render_engine::render::Renderer;
//!
//! fn run(window: &dyn RenderSurface) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RendererConfig::new("Demo").allow_integrated_gpu();
//!     let mut renderer = Renderer::new(BackendKind::Vulkan, &config, window)?;
//!
//!     renderer.draw_frame(&RenderPacket { delta_time: 0.016 })?;
//!
//!     renderer.shutdown();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::missing_errors_doc)]

pub mod foundation;
pub mod render;

pub use render::api::{BackendKind, RenderPacket, RendererConfig};
pub use render::{RenderError, Renderer};
