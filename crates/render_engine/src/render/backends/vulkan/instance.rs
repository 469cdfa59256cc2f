//! Vulkan instance management
//!
//! Handles instance creation with platform presentation extensions,
//! validation layer verification, and the debug messenger.

use ash::extensions::ext::DebugUtils;
use ash::{vk, Entry, Instance};
use raw_window_handle::RawDisplayHandle;
use std::ffi::{CStr, CString};

use crate::render::api::RendererConfig;
use crate::render::backends::vulkan::{VulkanError, VulkanResult};

const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Vulkan instance wrapper with RAII cleanup
pub struct VulkanInstance {
    /// Vulkan entry point
    entry: Entry,
    /// Vulkan instance handle
    instance: Instance,
    /// Debug messenger, present only when validation is active
    debug_utils: Option<(DebugUtils, vk::DebugUtilsMessengerEXT)>,
}

impl VulkanInstance {
    /// Create a new Vulkan instance
    ///
    /// Presentation extensions are derived from the platform display
    /// handle. When validation is requested (debug builds only), every
    /// requested layer must be present in the enumerated layer list or
    /// creation fails.
    pub fn new(config: &RendererConfig, display_handle: RawDisplayHandle) -> VulkanResult<Self> {
        let entry = unsafe { Entry::load() }.map_err(|e| {
            VulkanError::InitializationFailed(format!("Failed to load Vulkan: {e:?}"))
        })?;

        let app_name = CString::new(config.application_name.as_str())
            .map_err(|e| VulkanError::InitializationFailed(format!("Invalid app name: {e}")))?;
        let engine_name = CString::new("Render Engine").unwrap();
        let (major, minor, patch) = config.application_version;
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, major, minor, patch))
            .engine_name(&engine_name)
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_0);

        // Platform-required presentation extensions
        let mut extensions = ash_window::enumerate_required_extensions(display_handle)
            .map_err(VulkanError::Api)?
            .to_vec();

        let enable_validation = config.validation_enabled();
        if enable_validation {
            extensions.push(DebugUtils::name().as_ptr());
        }

        let layer_names: Vec<CString> = if enable_validation {
            vec![CString::new(VALIDATION_LAYER).unwrap()]
        } else {
            vec![]
        };
        Self::verify_layer_support(&entry, &layer_names)?;
        let layer_name_ptrs: Vec<*const i8> =
            layer_names.iter().map(|name| name.as_ptr()).collect();

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extensions)
            .enabled_layer_names(&layer_name_ptrs);

        let instance = unsafe {
            entry
                .create_instance(&create_info, None)
                .map_err(VulkanError::Api)?
        };
        log::info!("Vulkan instance created (validation: {})", enable_validation);

        let debug_utils = if enable_validation {
            Some(Self::setup_debug_messenger(&entry, &instance)?)
        } else {
            None
        };

        Ok(Self {
            entry,
            instance,
            debug_utils,
        })
    }

    /// Verify every requested layer is present in the enumerated layer list
    fn verify_layer_support(entry: &Entry, requested: &[CString]) -> VulkanResult<()> {
        if requested.is_empty() {
            return Ok(());
        }

        let available = entry
            .enumerate_instance_layer_properties()
            .map_err(VulkanError::Api)?;

        for layer in requested {
            let found = available.iter().any(|properties| {
                let name = unsafe { CStr::from_ptr(properties.layer_name.as_ptr()) };
                name == layer.as_c_str()
            });
            if !found {
                return Err(VulkanError::MissingValidationLayer(
                    layer.to_string_lossy().into_owned(),
                ));
            }
            log::debug!("Found validation layer: {}", layer.to_string_lossy());
        }

        Ok(())
    }

    fn setup_debug_messenger(
        entry: &Entry,
        instance: &Instance,
    ) -> VulkanResult<(DebugUtils, vk::DebugUtilsMessengerEXT)> {
        let debug_utils = DebugUtils::new(entry, instance);

        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(debug_callback));

        let messenger = unsafe {
            debug_utils
                .create_debug_utils_messenger(&create_info, None)
                .map_err(VulkanError::Api)?
        };

        Ok((debug_utils, messenger))
    }

    /// Get the Vulkan entry point
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Get the instance handle
    pub fn handle(&self) -> &Instance {
        &self.instance
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        log::debug!("Destroying Vulkan instance");
        unsafe {
            if let Some((debug_utils, messenger)) = self.debug_utils.take() {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
    }
}

/// Debug callback for validation layers
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    let message = CStr::from_ptr((*callback_data).p_message).to_string_lossy();

    if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        log::error!("[Vulkan] {:?} - {}", message_type, message);
    } else if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        log::warn!("[Vulkan] {:?} - {}", message_type, message);
    } else {
        log::debug!("[Vulkan] {:?} - {}", message_type, message);
    }

    vk::FALSE
}
