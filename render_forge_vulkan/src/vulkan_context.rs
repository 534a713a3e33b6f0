/// VulkanContext - headless instance and logical device for render_forge
///
/// Creates an instance (with validation layers when the `vulkan-validation`
/// feature is compiled in and requested), picks the first physical device
/// with a graphics queue and creates a logical device. The render pass
/// extensions are enabled when the device is older than Vulkan 1.2 and
/// supports them, so that `Device` can pick the `Khr` strategy.

use ash::vk;
use render_forge::forge::{Device, Error, Result};
use render_forge::{forge_debug, forge_error, forge_info};
use std::ffi::{CStr, CString};

use crate::vulkan_device::VulkanDeviceDispatch;

const SOURCE: &str = "forge::vulkan";

/// Severities forwarded by the validation messenger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationSeverity {
    ErrorsOnly,
    #[default]
    ErrorsAndWarnings,
    All,
}

/// Context creation settings
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Application name reported to the driver
    pub application_name: String,
    /// Highest API version to use, as from `vk::make_api_version()`
    pub api_version: u32,
    /// Enable `VK_LAYER_KHRONOS_validation` (needs the `vulkan-validation` feature)
    pub enable_validation: bool,
    /// Enable `VK_KHR_create_renderpass2` on devices below Vulkan 1.2
    pub enable_create_renderpass2: bool,
    /// Severities logged by the validation messenger
    pub validation_severity: ValidationSeverity,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            application_name: "render_forge".to_string(),
            api_version: vk::API_VERSION_1_2,
            enable_validation: cfg!(debug_assertions),
            enable_create_renderpass2: true,
            validation_severity: ValidationSeverity::default(),
        }
    }
}

#[cfg(feature = "vulkan-validation")]
type DebugMessenger = (ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT);

/// Headless Vulkan instance + device
pub struct VulkanContext {
    _entry: ash::Entry,
    instance: ash::Instance,
    #[cfg(feature = "vulkan-validation")]
    debug_messenger: Option<DebugMessenger>,
    physical_device: vk::PhysicalDevice,
    graphics_queue_family: u32,
    raw_device: ash::Device,
    device: Device,
}

/// Device extensions to enable for render pass creation
///
/// Returns nothing on 1.2+ devices (the entry points are core) or when not
/// requested. Below 1.1 `VK_KHR_create_renderpass2` also needs
/// `VK_KHR_multiview` and `VK_KHR_maintenance2`; if any of the required
/// extensions is missing nothing is enabled.
pub fn render_pass_extensions(
    device_version: u32,
    available: &[&CStr],
    enable_create_renderpass2: bool,
) -> Vec<&'static CStr> {
    let major = vk::api_version_major(device_version);
    let minor = vk::api_version_minor(device_version);
    if !enable_create_renderpass2 || (major, minor) >= (1, 2) {
        return Vec::new();
    }

    let mut required = vec![ash::khr::create_renderpass2::NAME];
    if (major, minor) < (1, 1) {
        required.push(ash::khr::multiview::NAME);
        required.push(ash::khr::maintenance2::NAME);
    }

    if required.iter().all(|name| available.contains(name)) {
        required
    } else {
        Vec::new()
    }
}

impl VulkanContext {
    /// Create instance and device
    ///
    /// # Errors
    ///
    /// `Error::InitializationFailed` when the loader, the instance, the
    /// messenger or the device cannot be created, or no physical device has
    /// a graphics queue.
    pub fn new(config: ContextConfig) -> Result<Self> {
        unsafe {
            let entry = ash::Entry::load().map_err(|e| {
                forge_error!(SOURCE, "Failed to load Vulkan library: {:?}", e);
                Error::InitializationFailed(format!("Failed to load Vulkan library: {:?}", e))
            })?;

            // A 1.0 loader rejects any higher apiVersion
            let loader_version = entry
                .try_enumerate_instance_version()
                .ok()
                .flatten()
                .unwrap_or(vk::API_VERSION_1_0);
            let instance_version = config.api_version.min(loader_version);

            let application_name = CString::new(config.application_name.clone()).map_err(|e| {
                forge_error!(SOURCE, "Invalid application name: {}", e);
                Error::InitializationFailed(format!("Invalid application name: {}", e))
            })?;
            let app_info = vk::ApplicationInfo::default()
                .application_name(&application_name)
                .application_version(vk::make_api_version(0, 1, 0, 0))
                .engine_name(c"render_forge")
                .engine_version(vk::make_api_version(0, 0, 1, 0))
                .api_version(instance_version);

            #[cfg_attr(not(feature = "vulkan-validation"), allow(unused_mut))]
            let mut extension_names: Vec<*const std::os::raw::c_char> = Vec::new();
            #[cfg_attr(not(feature = "vulkan-validation"), allow(unused_mut))]
            let mut layer_names: Vec<*const std::os::raw::c_char> = Vec::new();

            #[cfg(feature = "vulkan-validation")]
            if config.enable_validation {
                extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
                layer_names.push(c"VK_LAYER_KHRONOS_validation".as_ptr());
            }
            #[cfg(not(feature = "vulkan-validation"))]
            if config.enable_validation {
                render_forge::forge_warn!(SOURCE, "Validation requested but the vulkan-validation feature is disabled");
            }

            let create_info = vk::InstanceCreateInfo::default()
                .application_info(&app_info)
                .enabled_layer_names(&layer_names)
                .enabled_extension_names(&extension_names);

            let instance = entry.create_instance(&create_info, None).map_err(|e| {
                forge_error!(SOURCE, "Failed to create Vulkan instance: {:?}", e);
                Error::InitializationFailed(format!("Failed to create instance: {:?}", e))
            })?;

            #[cfg(feature = "vulkan-validation")]
            let debug_messenger = if config.enable_validation {
                match Self::create_debug_messenger(&entry, &instance, config.validation_severity) {
                    Ok(messenger) => Some(messenger),
                    Err(e) => {
                        instance.destroy_instance(None);
                        return Err(e);
                    }
                }
            } else {
                None
            };

            let context = Self::create_device(&instance, instance_version, &config);
            let (physical_device, graphics_queue_family, raw_device, device) = match context {
                Ok(parts) => parts,
                Err(e) => {
                    #[cfg(feature = "vulkan-validation")]
                    if let Some((debug_utils, messenger)) = debug_messenger {
                        crate::debug::cleanup_debug_config();
                        debug_utils.destroy_debug_utils_messenger(messenger, None);
                    }
                    instance.destroy_instance(None);
                    return Err(e);
                }
            };

            Ok(Self {
                _entry: entry,
                instance,
                #[cfg(feature = "vulkan-validation")]
                debug_messenger,
                physical_device,
                graphics_queue_family,
                raw_device,
                device,
            })
        }
    }

    #[cfg(feature = "vulkan-validation")]
    unsafe fn create_debug_messenger(
        entry: &ash::Entry,
        instance: &ash::Instance,
        severity: ValidationSeverity,
    ) -> Result<DebugMessenger> {
        let debug_utils = ash::ext::debug_utils::Instance::new(entry, instance);

        crate::debug::init_debug_config(severity);

        let debug_info = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(crate::debug::severity_flags(severity))
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(crate::debug::vulkan_debug_callback));

        let messenger = debug_utils
            .create_debug_utils_messenger(&debug_info, None)
            .map_err(|e| {
                crate::debug::cleanup_debug_config();
                forge_error!(SOURCE, "Failed to create debug messenger: {:?}", e);
                Error::InitializationFailed(format!("Failed to create debug messenger: {:?}", e))
            })?;

        Ok((debug_utils, messenger))
    }

    unsafe fn create_device(
        instance: &ash::Instance,
        instance_version: u32,
        config: &ContextConfig,
    ) -> Result<(vk::PhysicalDevice, u32, ash::Device, Device)> {
        let physical_devices = instance.enumerate_physical_devices().map_err(|e| {
            forge_error!(SOURCE, "Failed to enumerate physical devices: {:?}", e);
            Error::InitializationFailed(format!("Failed to enumerate physical devices: {:?}", e))
        })?;

        let (physical_device, graphics_queue_family) = physical_devices
            .into_iter()
            .find_map(|physical_device| {
                instance
                    .get_physical_device_queue_family_properties(physical_device)
                    .iter()
                    .position(|qf| qf.queue_flags.contains(vk::QueueFlags::GRAPHICS))
                    .map(|index| (physical_device, index as u32))
            })
            .ok_or_else(|| {
                forge_error!(SOURCE, "No Vulkan device with a graphics queue found");
                Error::InitializationFailed("No Vulkan device with a graphics queue found".to_string())
            })?;

        let properties = instance.get_physical_device_properties(physical_device);
        let device_version = instance_version.min(properties.api_version);

        let available_properties = instance
            .enumerate_device_extension_properties(physical_device)
            .map_err(|e| {
                forge_error!(SOURCE, "Failed to enumerate device extensions: {:?}", e);
                Error::InitializationFailed(format!("Failed to enumerate device extensions: {:?}", e))
            })?;
        let available: Vec<&CStr> = available_properties
            .iter()
            .filter_map(|properties| properties.extension_name_as_c_str().ok())
            .collect();

        let extensions = render_pass_extensions(device_version, &available, config.enable_create_renderpass2);
        let extension_pointers: Vec<_> = extensions.iter().map(|name| name.as_ptr()).collect();

        let queue_priorities = [1.0];
        let queue_create_infos = [vk::DeviceQueueCreateInfo::default()
            .queue_family_index(graphics_queue_family)
            .queue_priorities(&queue_priorities)];

        let device_create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_create_infos)
            .enabled_extension_names(&extension_pointers);

        let raw_device = instance
            .create_device(physical_device, &device_create_info, None)
            .map_err(|e| {
                forge_error!(SOURCE, "Failed to create logical device: {:?}", e);
                Error::InitializationFailed(format!("Failed to create device: {:?}", e))
            })?;

        let create_renderpass2_enabled = extensions.contains(&ash::khr::create_renderpass2::NAME);
        let dispatch = VulkanDeviceDispatch::new(instance, &raw_device, create_renderpass2_enabled);
        let device = Device::new(dispatch, device_version, &extensions);

        forge_info!(
            SOURCE,
            "Using {:?} (Vulkan {}.{}.{})",
            properties.device_name_as_c_str().unwrap_or(c"unknown device"),
            vk::api_version_major(device_version),
            vk::api_version_minor(device_version),
            vk::api_version_patch(device_version)
        );
        forge_debug!(SOURCE, "Enabled device extensions: {:?}", extensions);

        Ok((physical_device, graphics_queue_family, raw_device, device))
    }

    /// Device used to create render passes and shaders
    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn raw_device(&self) -> &ash::Device {
        &self.raw_device
    }

    pub fn instance(&self) -> &ash::Instance {
        &self.instance
    }

    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    pub fn graphics_queue_family(&self) -> u32 {
        self.graphics_queue_family
    }
}

impl Drop for VulkanContext {
    fn drop(&mut self) {
        unsafe {
            self.raw_device.device_wait_idle().ok();

            // Stop the callback before the messenger goes away
            #[cfg(feature = "vulkan-validation")]
            if let Some((debug_utils, messenger)) = self.debug_messenger.take() {
                crate::debug::cleanup_debug_config();
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }

            self.raw_device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_context_tests.rs"]
mod tests;
