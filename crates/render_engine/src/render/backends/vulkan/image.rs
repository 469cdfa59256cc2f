//! GPU image creation and lifetime
//!
//! Wraps an image, its backing device memory, and an optional view as
//! one unit. Creation either yields a fully bound image or cleans up
//! every partially created handle before returning the error; nothing
//! dangles on failure.

use ash::vk;
use ash::vk::Handle;

use crate::render::backends::vulkan::{VulkanError, VulkanResult};

/// Parameters for creating a [`VulkanImage`]
#[derive(Debug, Clone, Copy)]
pub struct ImageSpec {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Pixel format
    pub format: vk::Format,
    /// Tiling mode
    pub tiling: vk::ImageTiling,
    /// Usage flags
    pub usage: vk::ImageUsageFlags,
    /// Required memory property flags
    pub memory_flags: vk::MemoryPropertyFlags,
    /// When set, a view over this aspect is created alongside the image
    pub view_aspect: Option<vk::ImageAspectFlags>,
}

/// An image with its bound memory and optional view
///
/// Destruction needs the device, so this has no `Drop`; callers must
/// run [`VulkanImage::destroy`] before the device goes away.
pub struct VulkanImage {
    image: vk::Image,
    memory: vk::DeviceMemory,
    view: Option<vk::ImageView>,
    format: vk::Format,
    width: u32,
    height: u32,
}

impl VulkanImage {
    /// Create an image, allocate and bind its memory, and optionally
    /// create a view
    ///
    /// Any step failing unwinds the handles created so far. When no
    /// memory type satisfies the requested property flags, creation
    /// fails with [`VulkanError::NoSuitableMemoryType`].
    pub fn new(
        device: &ash::Device,
        memory_properties: &vk::PhysicalDeviceMemoryProperties,
        spec: &ImageSpec,
    ) -> VulkanResult<Self> {
        let create_info = vk::ImageCreateInfo::builder()
            .image_type(vk::ImageType::TYPE_2D)
            .extent(vk::Extent3D {
                width: spec.width,
                height: spec.height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .format(spec.format)
            .tiling(spec.tiling)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .usage(spec.usage)
            .samples(vk::SampleCountFlags::TYPE_1)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let image = unsafe {
            device
                .create_image(&create_info, None)
                .map_err(VulkanError::Api)?
        };

        let requirements = unsafe { device.get_image_memory_requirements(image) };
        let memory_index = match find_memory_index(
            memory_properties,
            requirements.memory_type_bits,
            spec.memory_flags,
        ) {
            Some(index) => index,
            None => {
                unsafe { device.destroy_image(image, None) };
                return Err(VulkanError::NoSuitableMemoryType);
            }
        };

        let alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(requirements.size)
            .memory_type_index(memory_index);

        let memory = match unsafe { device.allocate_memory(&alloc_info, None) } {
            Ok(memory) => memory,
            Err(e) => {
                unsafe { device.destroy_image(image, None) };
                return Err(VulkanError::Api(e));
            }
        };

        if let Err(e) = unsafe { device.bind_image_memory(image, memory, 0) } {
            unsafe {
                device.free_memory(memory, None);
                device.destroy_image(image, None);
            }
            return Err(VulkanError::Api(e));
        }

        let view = match spec.view_aspect {
            Some(aspect) => match create_view(device, image, spec.format, aspect) {
                Ok(view) => Some(view),
                Err(e) => {
                    unsafe {
                        device.free_memory(memory, None);
                        device.destroy_image(image, None);
                    }
                    return Err(e);
                }
            },
            None => None,
        };

        Ok(Self {
            image,
            memory,
            view,
            format: spec.format,
            width: spec.width,
            height: spec.height,
        })
    }

    /// Get the image handle
    pub fn handle(&self) -> vk::Image {
        self.image
    }

    /// Get the image view, if one was created
    pub fn view(&self) -> Option<vk::ImageView> {
        self.view
    }

    /// Get the image format
    pub fn format(&self) -> vk::Format {
        self.format
    }

    /// Get the image dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Destroy the view, memory, and image, in that order
    ///
    /// Safe to call more than once; handles are cleared on the first
    /// call and later calls are no-ops.
    pub fn destroy(&mut self, device: &ash::Device) {
        let (view, memory, image) = self.release_handles();
        unsafe {
            if let Some(view) = view {
                device.destroy_image_view(view, None);
            }
            if let Some(memory) = memory {
                device.free_memory(memory, None);
            }
            if let Some(image) = image {
                device.destroy_image(image, None);
            }
        }
    }

    /// Take ownership of the live handles, leaving null handles behind
    ///
    /// Already-released handles come back as `None`, which is what
    /// makes repeated destruction idempotent.
    fn release_handles(
        &mut self,
    ) -> (
        Option<vk::ImageView>,
        Option<vk::DeviceMemory>,
        Option<vk::Image>,
    ) {
        let view = self.view.take().filter(|v| v.as_raw() != 0);
        let memory = std::mem::take(&mut self.memory);
        let memory = (memory.as_raw() != 0).then_some(memory);
        let image = std::mem::take(&mut self.image);
        let image = (image.as_raw() != 0).then_some(image);
        (view, memory, image)
    }
}

fn create_view(
    device: &ash::Device,
    image: vk::Image,
    format: vk::Format,
    aspect: vk::ImageAspectFlags,
) -> VulkanResult<vk::ImageView> {
    let create_info = vk::ImageViewCreateInfo::builder()
        .image(image)
        .view_type(vk::ImageViewType::TYPE_2D)
        .format(format)
        .subresource_range(vk::ImageSubresourceRange {
            aspect_mask: aspect,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        });

    unsafe {
        device
            .create_image_view(&create_info, None)
            .map_err(VulkanError::Api)
    }
}

/// Find the index of a memory type matching the requirement bitmask
/// and property flags
///
/// Bit `i` of `type_bits` means memory type `i` is acceptable to the
/// resource; the chosen type must additionally carry all of `flags`.
pub(crate) fn find_memory_index(
    memory_properties: &vk::PhysicalDeviceMemoryProperties,
    type_bits: u32,
    flags: vk::MemoryPropertyFlags,
) -> Option<u32> {
    let count = memory_properties.memory_type_count as usize;
    for (index, memory_type) in memory_properties.memory_types[..count].iter().enumerate() {
        let acceptable = type_bits & (1 << index) != 0;
        if acceptable && memory_type.property_flags.contains(flags) {
            return Some(index as u32);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_properties(types: &[(vk::MemoryPropertyFlags, u32)]) -> vk::PhysicalDeviceMemoryProperties {
        let mut properties = vk::PhysicalDeviceMemoryProperties {
            memory_type_count: types.len() as u32,
            ..Default::default()
        };
        for (index, &(flags, heap)) in types.iter().enumerate() {
            properties.memory_types[index] = vk::MemoryType {
                property_flags: flags,
                heap_index: heap,
            };
        }
        properties
    }

    #[test]
    fn memory_index_matches_flags_and_bitmask() {
        let properties = memory_properties(&[
            (vk::MemoryPropertyFlags::HOST_VISIBLE, 0),
            (vk::MemoryPropertyFlags::DEVICE_LOCAL, 1),
        ]);
        let index = find_memory_index(&properties, 0b11, vk::MemoryPropertyFlags::DEVICE_LOCAL);
        assert_eq!(index, Some(1));
    }

    #[test]
    fn memory_index_respects_type_bitmask() {
        let properties = memory_properties(&[
            (vk::MemoryPropertyFlags::DEVICE_LOCAL, 0),
            (vk::MemoryPropertyFlags::DEVICE_LOCAL, 0),
        ]);
        // Type 0 carries the right flags but the resource only accepts type 1.
        let index = find_memory_index(&properties, 0b10, vk::MemoryPropertyFlags::DEVICE_LOCAL);
        assert_eq!(index, Some(1));
    }

    #[test]
    fn memory_index_requires_all_flags() {
        let properties = memory_properties(&[(vk::MemoryPropertyFlags::HOST_VISIBLE, 0)]);
        let wanted = vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;
        assert_eq!(find_memory_index(&properties, 0b1, wanted), None);
    }

    #[test]
    fn memory_index_without_match_is_none() {
        let properties = memory_properties(&[]);
        assert_eq!(
            find_memory_index(&properties, u32::MAX, vk::MemoryPropertyFlags::DEVICE_LOCAL),
            None
        );
    }

    #[test]
    fn release_is_idempotent() {
        let mut image = VulkanImage {
            image: vk::Image::from_raw(1),
            memory: vk::DeviceMemory::from_raw(2),
            view: Some(vk::ImageView::from_raw(3)),
            format: vk::Format::D32_SFLOAT,
            width: 4,
            height: 4,
        };

        let (view, memory, handle) = image.release_handles();
        assert!(view.is_some());
        assert!(memory.is_some());
        assert!(handle.is_some());

        let (view, memory, handle) = image.release_handles();
        assert!(view.is_none());
        assert!(memory.is_none());
        assert!(handle.is_none());
    }

    #[test]
    fn release_without_view_yields_no_view() {
        let mut image = VulkanImage {
            image: vk::Image::from_raw(1),
            memory: vk::DeviceMemory::from_raw(2),
            view: None,
            format: vk::Format::R8G8B8A8_UNORM,
            width: 2,
            height: 2,
        };
        let (view, memory, handle) = image.release_handles();
        assert!(view.is_none());
        assert!(memory.is_some());
        assert!(handle.is_some());
    }
}
