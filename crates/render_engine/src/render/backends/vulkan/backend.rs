//! Vulkan rendering backend
//!
//! Owns the whole Vulkan object graph for one window: instance,
//! surface, selected physical device, logical device, and swapchain.
//! Construction runs in that order and field order tears it down in
//! strict reverse when the backend is dropped.

use ash::vk;

use crate::render::api::{PresentPreference, RenderBackend, RendererConfig};
use crate::render::backends::vulkan::device::{
    DeviceRequirements, LogicalDevice, SelectedDevice,
};
use crate::render::backends::vulkan::instance::VulkanInstance;
use crate::render::backends::vulkan::surface::Surface;
use crate::render::backends::vulkan::swapchain::{
    AcquireAction, PresentAction, Swapchain,
};
use crate::render::backends::vulkan::{VulkanError, VulkanResult};
use crate::render::window::RenderSurface;
use crate::render::RenderError;

/// Frame-loop state of the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    /// Between frames; `begin_frame` is legal
    Ready,
    /// Inside a frame; only `end_frame` is legal
    FrameInProgress,
    /// Shut down; all frame calls fail
    ShuttingDown,
}

fn check_begin(state: FrameState) -> VulkanResult<()> {
    match state {
        FrameState::Ready => Ok(()),
        FrameState::FrameInProgress => Err(VulkanError::InvalidState(
            "begin_frame called while a frame is already in progress",
        )),
        FrameState::ShuttingDown => Err(VulkanError::InvalidState(
            "begin_frame called after shutdown",
        )),
    }
}

fn check_end(state: FrameState) -> VulkanResult<()> {
    match state {
        FrameState::FrameInProgress => Ok(()),
        FrameState::Ready => Err(VulkanError::InvalidState(
            "end_frame called without a matching begin_frame",
        )),
        FrameState::ShuttingDown => Err(VulkanError::InvalidState(
            "end_frame called after shutdown",
        )),
    }
}

/// Vulkan implementation of [`RenderBackend`]
///
/// Field declaration order is load-bearing: the swapchain must drop
/// before the logical device, the device before the surface, and the
/// surface before the instance.
pub struct VulkanBackend {
    swapchain: Swapchain,
    device: LogicalDevice,
    selected: SelectedDevice,
    surface: Surface,
    instance: VulkanInstance,

    depth_format: vk::Format,
    present_preference: PresentPreference,
    framebuffer_extent: (u32, u32),
    pending_resize: Option<(u32, u32)>,
    frame_number: u64,
    state: FrameState,
}

impl VulkanBackend {
    /// Initialize the backend against a window
    ///
    /// Instance, surface, device selection, logical device, then the
    /// swapchain. Any failure unwinds the already-built pieces through
    /// their own `Drop` impls.
    pub fn new<W>(config: &RendererConfig, window: &W) -> VulkanResult<Self>
    where
        W: RenderSurface + ?Sized,
    {
        log::info!("Initializing Vulkan backend");

        let instance = VulkanInstance::new(config, window.raw_display_handle())?;
        let surface = Surface::new(&instance, window)?;

        let requirements = DeviceRequirements::presenting(config.require_discrete_gpu);
        let mut selected = SelectedDevice::select(instance.handle(), &surface, &requirements)?;
        let device = LogicalDevice::new(instance.handle(), &selected)?;

        let depth_format = selected.detect_depth_format(instance.handle())?;
        let framebuffer_extent = window.framebuffer_size();
        let swapchain = Swapchain::new(
            &device,
            &surface,
            &mut selected,
            depth_format,
            config.present_preference,
            framebuffer_extent,
        )?;

        log::info!("Vulkan backend initialized");
        Ok(Self {
            swapchain,
            device,
            selected,
            surface,
            instance,
            depth_format,
            present_preference: config.present_preference,
            framebuffer_extent,
            pending_resize: None,
            frame_number: 0,
            state: FrameState::Ready,
        })
    }

    /// Acquire the next swapchain image for this frame
    ///
    /// An out-of-date swapchain is recreated here and the frame is
    /// reported as [`AcquireAction::RetryLater`]; the caller skips the
    /// frame and tries again.
    pub fn acquire_next_image(
        &mut self,
        timeout_ns: u64,
        image_available: vk::Semaphore,
        fence: vk::Fence,
    ) -> VulkanResult<AcquireAction> {
        match self
            .swapchain
            .acquire_next_image(timeout_ns, image_available, fence)?
        {
            AcquireAction::Recreate => {
                self.recreate_swapchain()?;
                Ok(AcquireAction::RetryLater)
            }
            action => Ok(action),
        }
    }

    /// Present an acquired image
    ///
    /// A suboptimal or out-of-date result triggers recreation, but the
    /// frame itself still counts as presented.
    pub fn present(
        &mut self,
        render_complete: vk::Semaphore,
        image_index: u32,
    ) -> VulkanResult<PresentAction> {
        let action = self
            .swapchain
            .present(self.device.present_queue, render_complete, image_index)?;
        if action == PresentAction::Recreate {
            self.recreate_swapchain()?;
        }
        Ok(action)
    }

    /// Logical device handle, for frame recording by higher layers
    pub fn device(&self) -> &ash::Device {
        &self.device.device
    }

    /// Graphics queue handle
    pub fn graphics_queue(&self) -> vk::Queue {
        self.device.graphics_queue
    }

    /// The active swapchain
    pub fn swapchain(&self) -> &Swapchain {
        &self.swapchain
    }

    fn recreate_swapchain(&mut self) -> VulkanResult<()> {
        self.device.wait_idle()?;
        self.swapchain.recreate(
            &self.device,
            &self.surface,
            &mut self.selected,
            self.depth_format,
            self.present_preference,
            self.framebuffer_extent,
        )
    }
}

impl RenderBackend for VulkanBackend {
    fn begin_frame(&mut self, _delta_time: f32) -> Result<(), RenderError> {
        check_begin(self.state)?;

        if let Some(extent) = self.pending_resize.take() {
            self.framebuffer_extent = extent;
            self.recreate_swapchain()?;
        }

        self.state = FrameState::FrameInProgress;
        Ok(())
    }

    fn end_frame(&mut self, _delta_time: f32) -> Result<(), RenderError> {
        check_end(self.state)?;
        self.frame_number += 1;
        self.state = FrameState::Ready;
        Ok(())
    }

    fn resized(&mut self, width: u32, height: u32) {
        log::debug!("Framebuffer resize recorded: {}x{}", width, height);
        self.pending_resize = Some((width, height));
    }

    fn frame_number(&self) -> u64 {
        self.frame_number
    }

    fn swapchain_extent(&self) -> (u32, u32) {
        let extent = self.swapchain.extent();
        (extent.width, extent.height)
    }

    fn shutdown(&mut self) {
        if self.state == FrameState::ShuttingDown {
            return;
        }
        log::info!("Shutting down Vulkan backend");
        if let Err(e) = self.device.wait_idle() {
            log::warn!("Device wait failed during shutdown: {e}");
        }
        self.state = FrameState::ShuttingDown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_is_only_legal_when_ready() {
        assert!(check_begin(FrameState::Ready).is_ok());
        assert!(matches!(
            check_begin(FrameState::FrameInProgress),
            Err(VulkanError::InvalidState(_))
        ));
        assert!(matches!(
            check_begin(FrameState::ShuttingDown),
            Err(VulkanError::InvalidState(_))
        ));
    }

    #[test]
    fn end_requires_a_frame_in_progress() {
        assert!(check_end(FrameState::FrameInProgress).is_ok());
        assert!(matches!(
            check_end(FrameState::Ready),
            Err(VulkanError::InvalidState(_))
        ));
        assert!(matches!(
            check_end(FrameState::ShuttingDown),
            Err(VulkanError::InvalidState(_))
        ));
    }
}
