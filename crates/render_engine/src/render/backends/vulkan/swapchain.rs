//! Swapchain creation and presentation lifecycle
//!
//! Negotiates surface format, present mode, extent, and image count
//! against the device's capability snapshot, owns the per-image views
//! and the depth attachment, and classifies acquire/present results
//! into the retry-or-recreate actions the frame loop acts on.
//!
//! The negotiation rules live in small pure functions over plain
//! capability structs so they stay testable without a device.

use ash::extensions::khr::Swapchain as SwapchainLoader;
use ash::vk;

use crate::render::api::PresentPreference;
use crate::render::backends::vulkan::device::{LogicalDevice, SelectedDevice, SwapchainSupportInfo};
use crate::render::backends::vulkan::image::{ImageSpec, VulkanImage};
use crate::render::backends::vulkan::surface::Surface;
use crate::render::backends::vulkan::{VulkanError, VulkanResult};

/// Frames that may be recorded concurrently
pub const MAX_FRAMES_IN_FLIGHT: u32 = 2;

/// What the frame loop should do after an image acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireAction {
    /// Render into the image at this index
    Use(u32),
    /// The swapchain no longer matches the surface; recreate it
    Recreate,
    /// No image was ready in time; skip this frame and try again
    RetryLater,
}

/// What the frame loop should do after presenting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentAction {
    /// The image was presented
    Complete,
    /// Presented (or not), but the swapchain should be recreated
    Recreate,
}

/// Pick the surface format, preferring 8-bit BGRA with sRGB color space
pub(crate) fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> vk::SurfaceFormatKHR {
    formats
        .iter()
        .copied()
        .find(|f| {
            f.format == vk::Format::B8G8R8A8_UNORM
                && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .unwrap_or(formats[0])
}

/// Pick the present mode; FIFO is the guaranteed fallback
pub(crate) fn choose_present_mode(
    modes: &[vk::PresentModeKHR],
    preference: PresentPreference,
) -> vk::PresentModeKHR {
    if preference == PresentPreference::LowLatency && modes.contains(&vk::PresentModeKHR::MAILBOX) {
        vk::PresentModeKHR::MAILBOX
    } else {
        vk::PresentModeKHR::FIFO
    }
}

/// Resolve the swapchain extent from the surface capabilities
///
/// A fixed `current_extent` wins; the all-ones sentinel means the
/// surface lets us choose, in which case the requested size is clamped
/// into the supported range.
pub(crate) fn resolve_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    requested: (u32, u32),
) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        return capabilities.current_extent;
    }
    vk::Extent2D {
        width: requested.0.clamp(
            capabilities.min_image_extent.width,
            capabilities.max_image_extent.width,
        ),
        height: requested.1.clamp(
            capabilities.min_image_extent.height,
            capabilities.max_image_extent.height,
        ),
    }
}

/// One image above the minimum, capped by the maximum when one exists
/// (zero means unbounded)
pub(crate) fn negotiate_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let mut count = capabilities.min_image_count + 1;
    if capabilities.max_image_count > 0 && count > capabilities.max_image_count {
        count = capabilities.max_image_count;
    }
    count
}

/// Image sharing mode between the graphics and present families
///
/// Distinct families get concurrent sharing across both; a shared
/// family uses exclusive mode with no family list.
pub(crate) fn sharing_config(graphics_family: u32, present_family: u32) -> (vk::SharingMode, Vec<u32>) {
    if graphics_family != present_family {
        (
            vk::SharingMode::CONCURRENT,
            vec![graphics_family, present_family],
        )
    } else {
        (vk::SharingMode::EXCLUSIVE, Vec::new())
    }
}

/// Classify the raw result of `vkAcquireNextImageKHR`
pub(crate) fn classify_acquire(
    result: Result<(u32, bool), vk::Result>,
) -> VulkanResult<AcquireAction> {
    match result {
        // A suboptimal image can still be rendered to; presentation
        // will report it again and trigger the recreate.
        Ok((image_index, _suboptimal)) => Ok(AcquireAction::Use(image_index)),
        Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(AcquireAction::Recreate),
        Err(vk::Result::TIMEOUT) | Err(vk::Result::NOT_READY) => Ok(AcquireAction::RetryLater),
        Err(e) => Err(VulkanError::Api(e)),
    }
}

/// Classify the raw result of `vkQueuePresentKHR`
pub(crate) fn classify_present(result: Result<bool, vk::Result>) -> VulkanResult<PresentAction> {
    match result {
        Ok(false) => Ok(PresentAction::Complete),
        Ok(true) => Ok(PresentAction::Recreate),
        Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(PresentAction::Recreate),
        Err(e) => Err(VulkanError::Api(e)),
    }
}

/// Swapchain with its images, views, and depth attachment
pub struct Swapchain {
    device: ash::Device,
    loader: SwapchainLoader,
    handle: vk::SwapchainKHR,
    surface_format: vk::SurfaceFormatKHR,
    extent: vk::Extent2D,
    images: Vec<vk::Image>,
    image_views: Vec<vk::ImageView>,
    depth_attachment: VulkanImage,
}

impl Swapchain {
    /// Create a swapchain sized to the requested framebuffer extent
    ///
    /// Re-queries the surface capability snapshot first so negotiation
    /// never runs against stale data; the fresh snapshot is written
    /// back into the selected device.
    pub fn new(
        device: &LogicalDevice,
        surface: &Surface,
        selected: &mut SelectedDevice,
        depth_format: vk::Format,
        preference: PresentPreference,
        requested_extent: (u32, u32),
    ) -> VulkanResult<Self> {
        selected.swapchain_support =
            SwapchainSupportInfo::query(surface, selected.physical_device)?;

        let (handle, surface_format, extent, images, image_views, depth_attachment) =
            create_resources(
                device,
                surface,
                selected,
                depth_format,
                preference,
                requested_extent,
            )?;

        log::info!(
            "Swapchain created: {}x{}, {} images",
            extent.width,
            extent.height,
            images.len()
        );

        Ok(Self {
            device: device.device.clone(),
            loader: device.swapchain_loader.clone(),
            handle,
            surface_format,
            extent,
            images,
            image_views,
            depth_attachment,
        })
    }

    /// Destroy and rebuild the swapchain at a new extent
    ///
    /// The caller must have waited for the device to go idle. On
    /// failure the old resources are already gone and the swapchain is
    /// unusable, which is fatal to the backend.
    pub fn recreate(
        &mut self,
        device: &LogicalDevice,
        surface: &Surface,
        selected: &mut SelectedDevice,
        depth_format: vk::Format,
        preference: PresentPreference,
        requested_extent: (u32, u32),
    ) -> VulkanResult<()> {
        log::debug!(
            "Recreating swapchain at {}x{}",
            requested_extent.0,
            requested_extent.1
        );
        self.destroy_resources();

        selected.swapchain_support =
            SwapchainSupportInfo::query(surface, selected.physical_device)?;

        let (handle, surface_format, extent, images, image_views, depth_attachment) =
            create_resources(
                device,
                surface,
                selected,
                depth_format,
                preference,
                requested_extent,
            )?;

        self.handle = handle;
        self.surface_format = surface_format;
        self.extent = extent;
        self.images = images;
        self.image_views = image_views;
        self.depth_attachment = depth_attachment;

        log::info!(
            "Swapchain recreated: {}x{}, {} images",
            extent.width,
            extent.height,
            self.images.len()
        );
        Ok(())
    }

    /// Acquire the next presentable image
    pub fn acquire_next_image(
        &self,
        timeout_ns: u64,
        image_available: vk::Semaphore,
        fence: vk::Fence,
    ) -> VulkanResult<AcquireAction> {
        let result = unsafe {
            self.loader
                .acquire_next_image(self.handle, timeout_ns, image_available, fence)
        };
        classify_acquire(result)
    }

    /// Present an acquired image on the given queue
    pub fn present(
        &self,
        present_queue: vk::Queue,
        render_complete: vk::Semaphore,
        image_index: u32,
    ) -> VulkanResult<PresentAction> {
        let wait_semaphores = [render_complete];
        let swapchains = [self.handle];
        let image_indices = [image_index];

        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(&wait_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        let result = unsafe { self.loader.queue_present(present_queue, &present_info) };
        classify_present(result)
    }

    /// Current swapchain extent
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// Negotiated surface format
    pub fn surface_format(&self) -> vk::SurfaceFormatKHR {
        self.surface_format
    }

    /// Number of swapchain images
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Views over the swapchain images, one per image
    pub fn image_views(&self) -> &[vk::ImageView] {
        &self.image_views
    }

    /// View over the depth attachment
    pub fn depth_view(&self) -> Option<vk::ImageView> {
        self.depth_attachment.view()
    }

    // Depth attachment first, then the image views, then the chain
    // handle. The presentable images belong to the swapchain and are
    // not destroyed individually.
    fn destroy_resources(&mut self) {
        use ash::vk::Handle;

        self.depth_attachment.destroy(&self.device);

        for view in self.image_views.drain(..) {
            unsafe { self.device.destroy_image_view(view, None) };
        }
        self.images.clear();

        if self.handle.as_raw() != 0 {
            unsafe { self.loader.destroy_swapchain(self.handle, None) };
            self.handle = vk::SwapchainKHR::null();
        }
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        log::debug!("Destroying swapchain");
        self.destroy_resources();
    }
}

type SwapchainResources = (
    vk::SwapchainKHR,
    vk::SurfaceFormatKHR,
    vk::Extent2D,
    Vec<vk::Image>,
    Vec<vk::ImageView>,
    VulkanImage,
);

fn create_resources(
    device: &LogicalDevice,
    surface: &Surface,
    selected: &SelectedDevice,
    depth_format: vk::Format,
    preference: PresentPreference,
    requested_extent: (u32, u32),
) -> VulkanResult<SwapchainResources> {
    let support = &selected.swapchain_support;

    let surface_format = choose_surface_format(&support.formats);
    let present_mode = choose_present_mode(&support.present_modes, preference);
    let extent = resolve_extent(&support.capabilities, requested_extent);
    let image_count = negotiate_image_count(&support.capabilities);
    let (sharing_mode, family_indices) =
        sharing_config(device.graphics_family, device.present_family);

    let create_info = vk::SwapchainCreateInfoKHR::builder()
        .surface(surface.handle())
        .min_image_count(image_count)
        .image_format(surface_format.format)
        .image_color_space(surface_format.color_space)
        .image_extent(extent)
        .image_array_layers(1)
        .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
        .image_sharing_mode(sharing_mode)
        .queue_family_indices(&family_indices)
        .pre_transform(support.capabilities.current_transform)
        .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
        .present_mode(present_mode)
        .clipped(true);

    let handle = unsafe {
        device
            .swapchain_loader
            .create_swapchain(&create_info, None)
            .map_err(VulkanError::Api)?
    };

    let images = unsafe {
        device
            .swapchain_loader
            .get_swapchain_images(handle)
            .map_err(VulkanError::Api)?
    };

    let mut image_views = Vec::with_capacity(images.len());
    for &image in &images {
        let view_info = vk::ImageViewCreateInfo::builder()
            .image(image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(surface_format.format)
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            });
        let view = unsafe {
            device
                .device
                .create_image_view(&view_info, None)
                .map_err(VulkanError::Api)
        };
        match view {
            Ok(view) => image_views.push(view),
            Err(e) => {
                for view in image_views.drain(..) {
                    unsafe { device.device.destroy_image_view(view, None) };
                }
                unsafe { device.swapchain_loader.destroy_swapchain(handle, None) };
                return Err(e);
            }
        }
    }

    let depth_spec = ImageSpec {
        width: extent.width,
        height: extent.height,
        format: depth_format,
        tiling: vk::ImageTiling::OPTIMAL,
        usage: vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT,
        memory_flags: vk::MemoryPropertyFlags::DEVICE_LOCAL,
        view_aspect: Some(vk::ImageAspectFlags::DEPTH),
    };
    let depth_attachment =
        match VulkanImage::new(&device.device, &selected.memory_properties, &depth_spec) {
            Ok(image) => image,
            Err(e) => {
                for view in image_views.drain(..) {
                    unsafe { device.device.destroy_image_view(view, None) };
                }
                unsafe { device.swapchain_loader.destroy_swapchain(handle, None) };
                return Err(e);
            }
        };

    Ok((
        handle,
        surface_format,
        extent,
        images,
        image_views,
        depth_attachment,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space,
        }
    }

    #[test]
    fn surface_format_prefers_bgra_srgb_nonlinear() {
        let formats = [
            format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        let chosen = choose_surface_format(&formats);
        assert_eq!(chosen.format, vk::Format::B8G8R8A8_UNORM);
    }

    #[test]
    fn surface_format_falls_back_to_first_entry() {
        let formats = [
            format(vk::Format::R16G16B16A16_SFLOAT, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::R8G8B8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        let chosen = choose_surface_format(&formats);
        assert_eq!(chosen.format, vk::Format::R16G16B16A16_SFLOAT);
    }

    #[test]
    fn present_mode_prefers_mailbox_for_low_latency() {
        let modes = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX];
        assert_eq!(
            choose_present_mode(&modes, PresentPreference::LowLatency),
            vk::PresentModeKHR::MAILBOX
        );
        assert_eq!(
            choose_present_mode(&modes, PresentPreference::Vsync),
            vk::PresentModeKHR::FIFO
        );
    }

    #[test]
    fn present_mode_defaults_to_fifo() {
        let modes = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::IMMEDIATE];
        assert_eq!(
            choose_present_mode(&modes, PresentPreference::LowLatency),
            vk::PresentModeKHR::FIFO
        );
    }

    #[test]
    fn fixed_current_extent_wins_over_request() {
        let capabilities = vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D {
                width: 800,
                height: 600,
            },
            ..Default::default()
        };
        let extent = resolve_extent(&capabilities, (1920, 1080));
        assert_eq!((extent.width, extent.height), (800, 600));
    }

    #[test]
    fn sentinel_extent_clamps_requested_size() {
        let capabilities = vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D {
                width: u32::MAX,
                height: u32::MAX,
            },
            min_image_extent: vk::Extent2D {
                width: 640,
                height: 480,
            },
            max_image_extent: vk::Extent2D {
                width: 1280,
                height: 720,
            },
            ..Default::default()
        };
        let too_big = resolve_extent(&capabilities, (4096, 4096));
        assert_eq!((too_big.width, too_big.height), (1280, 720));

        let too_small = resolve_extent(&capabilities, (1, 1));
        assert_eq!((too_small.width, too_small.height), (640, 480));

        let in_range = resolve_extent(&capabilities, (1024, 600));
        assert_eq!((in_range.width, in_range.height), (1024, 600));
    }

    #[test]
    fn image_count_is_min_plus_one_capped_by_max() {
        let capabilities = vk::SurfaceCapabilitiesKHR {
            min_image_count: 2,
            max_image_count: 3,
            ..Default::default()
        };
        assert_eq!(negotiate_image_count(&capabilities), 3);

        let tight = vk::SurfaceCapabilitiesKHR {
            min_image_count: 3,
            max_image_count: 3,
            ..Default::default()
        };
        assert_eq!(negotiate_image_count(&tight), 3);
    }

    #[test]
    fn zero_max_image_count_means_unbounded() {
        let capabilities = vk::SurfaceCapabilitiesKHR {
            min_image_count: 4,
            max_image_count: 0,
            ..Default::default()
        };
        assert_eq!(negotiate_image_count(&capabilities), 5);
    }

    #[test]
    fn split_families_share_concurrently() {
        let (mode, families) = sharing_config(0, 2);
        assert_eq!(mode, vk::SharingMode::CONCURRENT);
        assert_eq!(families, vec![0, 2]);

        let (mode, families) = sharing_config(1, 1);
        assert_eq!(mode, vk::SharingMode::EXCLUSIVE);
        assert!(families.is_empty());
    }

    #[test]
    fn acquire_success_uses_the_image() {
        assert_eq!(
            classify_acquire(Ok((3, false))).unwrap(),
            AcquireAction::Use(3)
        );
        // Suboptimal images are still usable this frame.
        assert_eq!(
            classify_acquire(Ok((1, true))).unwrap(),
            AcquireAction::Use(1)
        );
    }

    #[test]
    fn acquire_out_of_date_requests_recreate() {
        assert_eq!(
            classify_acquire(Err(vk::Result::ERROR_OUT_OF_DATE_KHR)).unwrap(),
            AcquireAction::Recreate
        );
    }

    #[test]
    fn acquire_timeout_retries_without_recreate() {
        assert_eq!(
            classify_acquire(Err(vk::Result::TIMEOUT)).unwrap(),
            AcquireAction::RetryLater
        );
        assert_eq!(
            classify_acquire(Err(vk::Result::NOT_READY)).unwrap(),
            AcquireAction::RetryLater
        );
    }

    #[test]
    fn acquire_device_loss_is_fatal() {
        let result = classify_acquire(Err(vk::Result::ERROR_DEVICE_LOST));
        assert!(matches!(
            result,
            Err(VulkanError::Api(vk::Result::ERROR_DEVICE_LOST))
        ));
    }

    #[test]
    fn present_suboptimal_requests_recreate() {
        assert_eq!(classify_present(Ok(false)).unwrap(), PresentAction::Complete);
        assert_eq!(classify_present(Ok(true)).unwrap(), PresentAction::Recreate);
        assert_eq!(
            classify_present(Err(vk::Result::ERROR_OUT_OF_DATE_KHR)).unwrap(),
            PresentAction::Recreate
        );
    }

    #[test]
    fn present_device_loss_is_fatal() {
        let result = classify_present(Err(vk::Result::ERROR_DEVICE_LOST));
        assert!(matches!(
            result,
            Err(VulkanError::Api(vk::Result::ERROR_DEVICE_LOST))
        ));
    }
}
