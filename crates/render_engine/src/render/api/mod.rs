//! Public rendering API surface
//!
//! Everything an application needs to drive the renderer without
//! touching a concrete backend: the backend trait, configuration,
//! and per-frame data.

pub mod frame_data;
pub mod render_backend;
pub mod renderer_config;

pub use frame_data::RenderPacket;
pub use render_backend::{BackendKind, BackendResult, RenderBackend};
pub use renderer_config::{ConfigError, PresentPreference, RendererConfig};
