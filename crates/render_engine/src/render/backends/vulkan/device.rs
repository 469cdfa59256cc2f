//! Physical device selection and logical device management
//!
//! Device selection is first-fit: candidates are evaluated in
//! enumeration order against a [`DeviceRequirements`] and the first one
//! passing every check wins. The checks run in a fixed order: discrete
//! GPU filter, queue-family matching, swapchain support, device
//! extensions, then features. Queue-family matching records the first
//! capable family for single-winner roles and uses a minimum-score
//! tie-break for transfer so dedicated transfer queues are preferred.

use ash::extensions::khr::Swapchain as SwapchainLoader;
use ash::{vk, Instance};
use std::collections::HashSet;
use std::ffi::{CStr, CString};

use crate::render::backends::vulkan::surface::Surface;
use crate::render::backends::vulkan::{VulkanError, VulkanResult};

bitflags::bitflags! {
    /// Queue roles a device must provide
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct QueueCaps: u32 {
        /// Graphics command support
        const GRAPHICS = 1;
        /// Presentation support against the target surface
        const PRESENT = 1 << 1;
        /// Compute command support
        const COMPUTE = 1 << 2;
        /// Transfer command support
        const TRANSFER = 1 << 3;
    }
}

/// Requirements a physical device must satisfy to be selected
///
/// Constructed once per selection attempt and treated as immutable.
#[derive(Debug, Clone)]
pub struct DeviceRequirements {
    /// Queue roles that must resolve to a family index
    pub queues: QueueCaps,
    /// Reject devices that are not discrete GPUs
    pub discrete_gpu: bool,
    /// Require the sampler anisotropy feature
    pub sampler_anisotropy: bool,
    /// Device extensions that must be available (exact name match)
    pub extensions: Vec<CString>,
}

impl DeviceRequirements {
    /// Standard requirements for a presenting renderer
    pub fn presenting(discrete_gpu: bool) -> Self {
        Self {
            queues: QueueCaps::GRAPHICS | QueueCaps::PRESENT | QueueCaps::TRANSFER,
            discrete_gpu,
            sampler_anisotropy: true,
            extensions: vec![SwapchainLoader::name().to_owned()],
        }
    }
}

/// Role-to-family-index mapping produced by queue-family matching
///
/// A role is `Some(index)` only when that family's capability bitset
/// contains the role's bit (for present: when the surface reports
/// presentation support for that family).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyAssignment {
    /// Graphics family index
    pub graphics: Option<u32>,
    /// Present family index
    pub present: Option<u32>,
    /// Compute family index
    pub compute: Option<u32>,
    /// Transfer family index
    pub transfer: Option<u32>,
}

impl QueueFamilyAssignment {
    /// Whether every required role has an assigned family
    pub fn satisfies(&self, required: QueueCaps) -> bool {
        let graphics_ok = !required.contains(QueueCaps::GRAPHICS) || self.graphics.is_some();
        let present_ok = !required.contains(QueueCaps::PRESENT) || self.present.is_some();
        let compute_ok = !required.contains(QueueCaps::COMPUTE) || self.compute.is_some();
        let transfer_ok = !required.contains(QueueCaps::TRANSFER) || self.transfer.is_some();
        graphics_ok && present_ok && compute_ok && transfer_ok
    }
}

/// Per-family capability snapshot used by queue matching
#[derive(Debug, Clone, Copy)]
pub(crate) struct QueueFamilyCaps {
    /// Queue capability bits reported by the device
    pub flags: vk::QueueFlags,
    /// Whether this family can present to the target surface
    pub present_support: bool,
}

/// Assign queue-family roles from a capability scan
///
/// Single pass over the families. Graphics, compute, and present each
/// record the first capable family. Transfer keeps a running minimum
/// score, where a family's score is the number of other capability
/// bits (graphics, compute) it also advertises; a transfer-capable
/// family wins the role when its score is at or below the minimum, so
/// a dedicated transfer-only family beats a do-everything family.
pub(crate) fn assign_queue_families(families: &[QueueFamilyCaps]) -> QueueFamilyAssignment {
    let mut assignment = QueueFamilyAssignment::default();
    let mut min_transfer_score = u8::MAX;

    for (index, family) in families.iter().enumerate() {
        let index = index as u32;
        let mut transfer_score = 0u8;

        if family.flags.contains(vk::QueueFlags::GRAPHICS) {
            if assignment.graphics.is_none() {
                assignment.graphics = Some(index);
            }
            transfer_score += 1;
        }

        if family.flags.contains(vk::QueueFlags::COMPUTE) {
            if assignment.compute.is_none() {
                assignment.compute = Some(index);
            }
            transfer_score += 1;
        }

        if family.flags.contains(vk::QueueFlags::TRANSFER) && transfer_score <= min_transfer_score {
            min_transfer_score = transfer_score;
            assignment.transfer = Some(index);
        }

        if family.present_support && assignment.present.is_none() {
            assignment.present = Some(index);
        }
    }

    assignment
}

/// Device + surface capability snapshot for swapchain negotiation
///
/// Always replaced wholesale so the format and present-mode lists can
/// never be stale relative to each other.
#[derive(Debug, Clone, Default)]
pub struct SwapchainSupportInfo {
    /// Surface capabilities (image counts, extents, transforms)
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    /// Supported surface formats, in device order
    pub formats: Vec<vk::SurfaceFormatKHR>,
    /// Supported present modes, in device order
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupportInfo {
    /// Query a fresh capability snapshot for a device/surface pair
    pub fn query(surface: &Surface, physical_device: vk::PhysicalDevice) -> VulkanResult<Self> {
        Ok(Self {
            capabilities: surface.capabilities(physical_device)?,
            formats: surface.formats(physical_device)?,
            present_modes: surface.present_modes(physical_device)?,
        })
    }
}

/// Everything gathered about a candidate during evaluation
pub(crate) struct DeviceCandidate {
    pub device_type: vk::PhysicalDeviceType,
    pub features: vk::PhysicalDeviceFeatures,
    pub available_extensions: Vec<CString>,
    pub families: Vec<QueueFamilyCaps>,
    pub support: SwapchainSupportInfo,
}

/// Evaluate one candidate against the requirements
///
/// Returns the queue assignment when the candidate passes every check,
/// in order: discrete filter, queue matching, swapchain support,
/// extension matching, feature matching.
pub(crate) fn meets_requirements(
    candidate: &DeviceCandidate,
    requirements: &DeviceRequirements,
) -> Option<QueueFamilyAssignment> {
    if requirements.discrete_gpu && candidate.device_type != vk::PhysicalDeviceType::DISCRETE_GPU {
        log::debug!("Device is not a discrete GPU and one is required, skipping");
        return None;
    }

    let assignment = assign_queue_families(&candidate.families);
    if !assignment.satisfies(requirements.queues) {
        log::debug!("Device does not satisfy the queue requirements, skipping");
        return None;
    }

    if candidate.support.formats.is_empty() || candidate.support.present_modes.is_empty() {
        log::debug!("Required swapchain support not present, skipping");
        return None;
    }

    for required in &requirements.extensions {
        let found = candidate
            .available_extensions
            .iter()
            .any(|available| available.as_c_str() == required.as_c_str());
        if !found {
            log::debug!(
                "Required extension not found: {:?}, skipping",
                required.to_string_lossy()
            );
            return None;
        }
    }

    if requirements.sampler_anisotropy && candidate.features.sampler_anisotropy != vk::TRUE {
        log::debug!("Device does not support samplerAnisotropy, skipping");
        return None;
    }

    Some(assignment)
}

/// First-fit selection over prepared candidates
pub(crate) fn first_fit(
    candidates: &[DeviceCandidate],
    requirements: &DeviceRequirements,
) -> VulkanResult<(usize, QueueFamilyAssignment)> {
    for (index, candidate) in candidates.iter().enumerate() {
        if let Some(assignment) = meets_requirements(candidate, requirements) {
            return Ok((index, assignment));
        }
    }
    Err(VulkanError::NoSuitableDevice)
}

/// The selected physical device and everything cached about it
///
/// Created once by device selection and read-only afterwards, except
/// for the swapchain support snapshot which is refreshed wholesale
/// whenever the swapchain is (re)created.
pub struct SelectedDevice {
    /// Physical device handle
    pub physical_device: vk::PhysicalDevice,
    /// Queue-family role assignment
    pub queue_families: QueueFamilyAssignment,
    /// Swapchain capability snapshot
    pub swapchain_support: SwapchainSupportInfo,
    /// Cached device properties
    pub properties: vk::PhysicalDeviceProperties,
    /// Cached device features
    pub features: vk::PhysicalDeviceFeatures,
    /// Cached memory layout
    pub memory_properties: vk::PhysicalDeviceMemoryProperties,
}

impl SelectedDevice {
    /// Enumerate physical devices and select the first suitable one
    pub fn select(
        instance: &Instance,
        surface: &Surface,
        requirements: &DeviceRequirements,
    ) -> VulkanResult<Self> {
        let physical_devices = unsafe {
            instance
                .enumerate_physical_devices()
                .map_err(VulkanError::Api)?
        };
        if physical_devices.is_empty() {
            log::error!("No devices which support Vulkan were found");
            return Err(VulkanError::NoSuitableDevice);
        }

        let mut candidates = Vec::with_capacity(physical_devices.len());
        for &device in &physical_devices {
            candidates.push(Self::gather_candidate(instance, surface, device)?);
        }

        let (index, assignment) = first_fit(&candidates, requirements)?;
        let device = physical_devices[index];
        let candidate = candidates.swap_remove(index);

        let properties = unsafe { instance.get_physical_device_properties(device) };
        let memory_properties = unsafe { instance.get_physical_device_memory_properties(device) };
        log_selection_report(&properties, &memory_properties, &assignment);

        Ok(Self {
            physical_device: device,
            queue_families: assignment,
            swapchain_support: candidate.support,
            properties,
            features: candidate.features,
            memory_properties,
        })
    }

    fn gather_candidate(
        instance: &Instance,
        surface: &Surface,
        device: vk::PhysicalDevice,
    ) -> VulkanResult<DeviceCandidate> {
        let properties = unsafe { instance.get_physical_device_properties(device) };
        let features = unsafe { instance.get_physical_device_features(device) };

        let family_properties =
            unsafe { instance.get_physical_device_queue_family_properties(device) };
        let mut families = Vec::with_capacity(family_properties.len());
        for (index, family) in family_properties.iter().enumerate() {
            families.push(QueueFamilyCaps {
                flags: family.queue_flags,
                present_support: surface.supports_present(device, index as u32)?,
            });
        }

        let available_extensions = unsafe {
            instance
                .enumerate_device_extension_properties(device)
                .map_err(VulkanError::Api)?
        }
        .iter()
        .map(|ext| unsafe { CStr::from_ptr(ext.extension_name.as_ptr()) }.to_owned())
        .collect();

        Ok(DeviceCandidate {
            device_type: properties.device_type,
            features,
            available_extensions,
            families,
            support: SwapchainSupportInfo::query(surface, device)?,
        })
    }

    /// Detect a depth format supported by this device
    ///
    /// Probes a fixed preference order against the reported tiling
    /// features. An optimal-tiling match returns immediately; a
    /// linear-tiling match is kept as a fallback while scanning
    /// continues. No match at all is fatal to swapchain creation.
    pub fn detect_depth_format(&self, instance: &Instance) -> VulkanResult<vk::Format> {
        pick_depth_format(|format| unsafe {
            instance.get_physical_device_format_properties(self.physical_device, format)
        })
        .ok_or(VulkanError::NoSupportedDepthFormat)
    }
}

/// Depth format candidates, most preferred first
const DEPTH_FORMAT_CANDIDATES: [vk::Format; 3] = [
    vk::Format::D32_SFLOAT,
    vk::Format::D32_SFLOAT_S8_UINT,
    vk::Format::D24_UNORM_S8_UINT,
];

pub(crate) fn pick_depth_format(
    mut format_properties: impl FnMut(vk::Format) -> vk::FormatProperties,
) -> Option<vk::Format> {
    let required = vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT;
    let mut fallback = None;

    for &candidate in &DEPTH_FORMAT_CANDIDATES {
        let properties = format_properties(candidate);
        if properties.linear_tiling_features.contains(required) {
            fallback = Some(candidate);
        } else if properties.optimal_tiling_features.contains(required) {
            return Some(candidate);
        }
    }

    fallback
}

fn log_selection_report(
    properties: &vk::PhysicalDeviceProperties,
    memory: &vk::PhysicalDeviceMemoryProperties,
    assignment: &QueueFamilyAssignment,
) {
    let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }.to_string_lossy();
    log::info!("Selected GPU: {}", name);

    let gpu_type = match properties.device_type {
        vk::PhysicalDeviceType::INTEGRATED_GPU => "Integrated",
        vk::PhysicalDeviceType::DISCRETE_GPU => "Discrete",
        vk::PhysicalDeviceType::VIRTUAL_GPU => "Virtual",
        vk::PhysicalDeviceType::CPU => "CPU",
        _ => "Unknown",
    };
    log::info!("GPU type: {}", gpu_type);

    log::info!(
        "GPU driver version: {}.{}.{}",
        vk::api_version_major(properties.driver_version),
        vk::api_version_minor(properties.driver_version),
        vk::api_version_patch(properties.driver_version),
    );
    log::info!(
        "Vulkan API version: {}.{}.{}",
        vk::api_version_major(properties.api_version),
        vk::api_version_minor(properties.api_version),
        vk::api_version_patch(properties.api_version),
    );

    for heap in &memory.memory_heaps[..memory.memory_heap_count as usize] {
        let size_gib = heap.size as f32 / (1024.0 * 1024.0 * 1024.0);
        if heap.flags.contains(vk::MemoryHeapFlags::DEVICE_LOCAL) {
            log::info!("Local GPU memory: {:.2} GiB", size_gib);
        } else {
            log::info!("Shared system memory: {:.2} GiB", size_gib);
        }
    }

    log::info!(
        "Queue families: graphics={:?} present={:?} compute={:?} transfer={:?}",
        assignment.graphics,
        assignment.present,
        assignment.compute,
        assignment.transfer,
    );
}

/// Logical device wrapper with its command queues
///
/// Owns the `ash::Device` and one queue handle per role. Destroyed
/// before the instance; `Drop` waits for the device to go idle first.
pub struct LogicalDevice {
    /// Vulkan logical device handle
    pub device: ash::Device,
    /// Swapchain extension loader
    pub swapchain_loader: SwapchainLoader,
    /// Graphics queue handle
    pub graphics_queue: vk::Queue,
    /// Present queue handle
    pub present_queue: vk::Queue,
    /// Transfer queue handle
    pub transfer_queue: vk::Queue,
    /// Graphics family index the queue was created from
    pub graphics_family: u32,
    /// Present family index the queue was created from
    pub present_family: u32,
    /// Transfer family index the queue was created from
    pub transfer_family: u32,
}

impl LogicalDevice {
    /// Create the logical device and retrieve its queues
    ///
    /// One queue-create request is emitted per distinct family index
    /// among graphics, present, and transfer; shared indices get a
    /// single request. Each queue handle is then fetched from its own
    /// assigned family index. Failure here is fatal to initialization.
    pub fn new(instance: &Instance, selected: &SelectedDevice) -> VulkanResult<Self> {
        log::info!("Creating logical device");

        let graphics_family = require_family(selected.queue_families.graphics, "graphics")?;
        let present_family = require_family(selected.queue_families.present, "present")?;
        let transfer_family = require_family(selected.queue_families.transfer, "transfer")?;

        let unique_families: HashSet<u32> = [graphics_family, present_family, transfer_family]
            .iter()
            .copied()
            .collect();

        let queue_priorities = [1.0];
        let queue_infos: Vec<vk::DeviceQueueCreateInfo> = unique_families
            .iter()
            .map(|&family| {
                vk::DeviceQueueCreateInfo::builder()
                    .queue_family_index(family)
                    .queue_priorities(&queue_priorities)
                    .build()
            })
            .collect();

        let required_extensions = [SwapchainLoader::name().as_ptr()];
        let device_features = vk::PhysicalDeviceFeatures::builder().sampler_anisotropy(true);

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&required_extensions)
            .enabled_features(&device_features);

        let device = unsafe {
            instance
                .create_device(selected.physical_device, &create_info, None)
                .map_err(VulkanError::Api)?
        };
        log::info!("Logical device created");

        let graphics_queue = unsafe { device.get_device_queue(graphics_family, 0) };
        let present_queue = unsafe { device.get_device_queue(present_family, 0) };
        let transfer_queue = unsafe { device.get_device_queue(transfer_family, 0) };
        log::debug!("Queues obtained");

        let swapchain_loader = SwapchainLoader::new(instance, &device);

        Ok(Self {
            device,
            swapchain_loader,
            graphics_queue,
            present_queue,
            transfer_queue,
            graphics_family,
            present_family,
            transfer_family,
        })
    }

    /// Wait for all queues on the device to finish
    pub fn wait_idle(&self) -> VulkanResult<()> {
        unsafe { self.device.device_wait_idle().map_err(VulkanError::Api) }
    }
}

fn require_family(index: Option<u32>, role: &'static str) -> VulkanResult<u32> {
    index.ok_or_else(|| {
        VulkanError::InitializationFailed(format!("No {role} queue family was assigned"))
    })
}

impl Drop for LogicalDevice {
    fn drop(&mut self) {
        log::debug!("Destroying logical device");
        unsafe {
            let _ = self.device.device_wait_idle();
            self.device.destroy_device(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(flags: vk::QueueFlags, present_support: bool) -> QueueFamilyCaps {
        QueueFamilyCaps {
            flags,
            present_support,
        }
    }

    fn support_with_entries() -> SwapchainSupportInfo {
        SwapchainSupportInfo {
            capabilities: vk::SurfaceCapabilitiesKHR::default(),
            formats: vec![vk::SurfaceFormatKHR {
                format: vk::Format::R8G8B8A8_UNORM,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            }],
            present_modes: vec![vk::PresentModeKHR::FIFO],
        }
    }

    fn anisotropic_features() -> vk::PhysicalDeviceFeatures {
        vk::PhysicalDeviceFeatures {
            sampler_anisotropy: vk::TRUE,
            ..Default::default()
        }
    }

    fn suitable_candidate() -> DeviceCandidate {
        DeviceCandidate {
            device_type: vk::PhysicalDeviceType::DISCRETE_GPU,
            features: anisotropic_features(),
            available_extensions: vec![SwapchainLoader::name().to_owned()],
            families: vec![family(
                vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE | vk::QueueFlags::TRANSFER,
                true,
            )],
            support: support_with_entries(),
        }
    }

    fn presenting_requirements() -> DeviceRequirements {
        DeviceRequirements::presenting(true)
    }

    #[test]
    fn transfer_tie_break_prefers_dedicated_family() {
        // Family 0 advertises everything (score 2); family 1 is
        // transfer-only (score 0) and must win the transfer role.
        let families = [
            family(
                vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE | vk::QueueFlags::TRANSFER,
                true,
            ),
            family(vk::QueueFlags::TRANSFER, false),
        ];
        let assignment = assign_queue_families(&families);
        assert_eq!(assignment.graphics, Some(0));
        assert_eq!(assignment.compute, Some(0));
        assert_eq!(assignment.present, Some(0));
        assert_eq!(assignment.transfer, Some(1));
    }

    #[test]
    fn transfer_tie_break_equal_scores_takes_later_family() {
        let families = [
            family(vk::QueueFlags::TRANSFER, false),
            family(vk::QueueFlags::TRANSFER, false),
        ];
        let assignment = assign_queue_families(&families);
        assert_eq!(assignment.transfer, Some(1));
    }

    #[test]
    fn roles_only_map_to_capable_families() {
        let families = [
            family(vk::QueueFlags::TRANSFER, false),
            family(vk::QueueFlags::GRAPHICS, false),
            family(vk::QueueFlags::COMPUTE, true),
        ];
        let assignment = assign_queue_families(&families);
        assert_eq!(assignment.graphics, Some(1));
        assert_eq!(assignment.compute, Some(2));
        assert_eq!(assignment.present, Some(2));
        // Graphics-only and compute-only families score 1; the
        // transfer-only family at index 0 already holds the role.
        assert_eq!(assignment.transfer, Some(0));
    }

    #[test]
    fn unassigned_roles_stay_none() {
        let assignment = assign_queue_families(&[family(vk::QueueFlags::GRAPHICS, false)]);
        assert_eq!(assignment.present, None);
        assert_eq!(assignment.compute, None);
        assert_eq!(assignment.transfer, None);
    }

    #[test]
    fn first_fit_accepts_a_suitable_candidate() {
        let candidates = vec![suitable_candidate()];
        let (index, assignment) = first_fit(&candidates, &presenting_requirements()).unwrap();
        assert_eq!(index, 0);
        assert!(assignment.satisfies(presenting_requirements().queues));
    }

    #[test]
    fn first_fit_with_no_candidates_reports_no_suitable_device() {
        let result = first_fit(&[], &presenting_requirements());
        assert!(matches!(result, Err(VulkanError::NoSuitableDevice)));
    }

    #[test]
    fn discrete_filter_rejects_integrated_gpu() {
        let mut candidate = suitable_candidate();
        candidate.device_type = vk::PhysicalDeviceType::INTEGRATED_GPU;
        assert!(meets_requirements(&candidate, &presenting_requirements()).is_none());

        let mut relaxed = presenting_requirements();
        relaxed.discrete_gpu = false;
        assert!(meets_requirements(&candidate, &relaxed).is_some());
    }

    #[test]
    fn missing_required_extension_rejects_candidate() {
        let mut candidate = suitable_candidate();
        candidate.available_extensions.clear();
        assert!(meets_requirements(&candidate, &presenting_requirements()).is_none());
    }

    #[test]
    fn extension_match_is_order_independent() {
        let mut candidate = suitable_candidate();
        candidate.available_extensions = vec![
            CString::new("VK_EXT_debug_marker").unwrap(),
            SwapchainLoader::name().to_owned(),
            CString::new("VK_KHR_maintenance1").unwrap(),
        ];
        assert!(meets_requirements(&candidate, &presenting_requirements()).is_some());
    }

    #[test]
    fn empty_format_list_rejects_candidate() {
        let mut candidate = suitable_candidate();
        candidate.support.formats.clear();
        assert!(meets_requirements(&candidate, &presenting_requirements()).is_none());
    }

    #[test]
    fn missing_anisotropy_rejects_candidate() {
        let mut candidate = suitable_candidate();
        candidate.features = vk::PhysicalDeviceFeatures::default();
        assert!(meets_requirements(&candidate, &presenting_requirements()).is_none());
    }

    #[test]
    fn missing_required_queue_rejects_candidate() {
        let mut candidate = suitable_candidate();
        // No family can present.
        candidate.families = vec![family(
            vk::QueueFlags::GRAPHICS | vk::QueueFlags::TRANSFER,
            false,
        )];
        assert!(meets_requirements(&candidate, &presenting_requirements()).is_none());
    }

    #[test]
    fn depth_format_optimal_match_returns_immediately() {
        let chosen = pick_depth_format(|format| {
            let mut properties = vk::FormatProperties::default();
            if format == vk::Format::D32_SFLOAT {
                properties.optimal_tiling_features =
                    vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT;
            }
            properties
        });
        assert_eq!(chosen, Some(vk::Format::D32_SFLOAT));
    }

    #[test]
    fn depth_format_linear_match_is_fallback_only() {
        // First candidate only supports linear tiling; a later
        // candidate with optimal tiling must still win.
        let chosen = pick_depth_format(|format| {
            let mut properties = vk::FormatProperties::default();
            match format {
                vk::Format::D32_SFLOAT => {
                    properties.linear_tiling_features =
                        vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT;
                }
                vk::Format::D24_UNORM_S8_UINT => {
                    properties.optimal_tiling_features =
                        vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT;
                }
                _ => {}
            }
            properties
        });
        assert_eq!(chosen, Some(vk::Format::D24_UNORM_S8_UINT));
    }

    #[test]
    fn depth_format_linear_only_still_resolves() {
        let chosen = pick_depth_format(|format| {
            let mut properties = vk::FormatProperties::default();
            if format == vk::Format::D32_SFLOAT_S8_UINT {
                properties.linear_tiling_features =
                    vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT;
            }
            properties
        });
        assert_eq!(chosen, Some(vk::Format::D32_SFLOAT_S8_UINT));
    }

    #[test]
    fn depth_format_without_any_support_fails() {
        assert_eq!(pick_depth_format(|_| vk::FormatProperties::default()), None);
    }
}
