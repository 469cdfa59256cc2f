//! Frame rendering data structures

/// A packet of information the renderer needs for one frame
///
/// `delta_time` is measured by the caller (seconds since the previous
/// frame) and forwarded to the backend unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderPacket {
    /// Seconds elapsed since the previous frame
    pub delta_time: f32,
}
