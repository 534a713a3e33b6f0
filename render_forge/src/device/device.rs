/// Device - a Vulkan device dispatch table plus the strategies picked for it
///
/// The dispatch table is abstracted behind [`DeviceDispatch`] so objects can
/// be created against a real `ash::Device` (see the `render_forge_vulkan`
/// crate) or against a test double.

use ash::prelude::VkResult;
use ash::vk;
use std::ffi::{CStr, CString};
use std::fmt;

/// Raw device-level entry points used by render_forge
///
/// Mirrors the Vulkan functions one-to-one, without allocation callbacks.
pub trait DeviceDispatch: Send + Sync {
    /// `vkCreateRenderPass`
    ///
    /// # Safety
    ///
    /// `info` and everything it points to has to be valid for the call.
    unsafe fn create_render_pass(&self, info: &vk::RenderPassCreateInfo<'_>) -> VkResult<vk::RenderPass>;

    /// `vkCreateRenderPass2KHR` from `VK_KHR_create_renderpass2`
    ///
    /// # Safety
    ///
    /// `info` and everything it points to has to be valid for the call.
    unsafe fn create_render_pass2_khr(&self, info: &vk::RenderPassCreateInfo2<'_>) -> VkResult<vk::RenderPass>;

    /// `vkCreateRenderPass2` from Vulkan 1.2
    ///
    /// # Safety
    ///
    /// `info` and everything it points to has to be valid for the call.
    unsafe fn create_render_pass2(&self, info: &vk::RenderPassCreateInfo2<'_>) -> VkResult<vk::RenderPass>;

    /// `vkDestroyRenderPass`
    ///
    /// # Safety
    ///
    /// `render_pass` has to come from this device and must not be in use.
    unsafe fn destroy_render_pass(&self, render_pass: vk::RenderPass);

    /// `vkCreateShaderModule`
    ///
    /// # Safety
    ///
    /// `info` and the code it points to has to be valid for the call.
    unsafe fn create_shader_module(&self, info: &vk::ShaderModuleCreateInfo<'_>) -> VkResult<vk::ShaderModule>;

    /// `vkDestroyShaderModule`
    ///
    /// # Safety
    ///
    /// `module` has to come from this device.
    unsafe fn destroy_shader_module(&self, module: vk::ShaderModule);
}

/// Which entry point creates render passes on a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPassCreateImplementation {
    /// `vkCreateRenderPass` with the flattened "version 1" structure
    Default,
    /// `vkCreateRenderPass2KHR` with the "version 2" structure
    Khr,
    /// `vkCreateRenderPass2` with the "version 2" structure
    Vulkan12,
}

/// A device: dispatch table, version and enabled extensions
pub struct Device {
    dispatch: Box<dyn DeviceDispatch>,
    version: u32,
    enabled_extensions: Vec<CString>,
    render_pass_implementation: RenderPassCreateImplementation,
}

impl Device {
    const SOURCE: &'static str = "forge::Device";

    /// Wrap a dispatch table
    ///
    /// # Arguments
    ///
    /// * `dispatch` - Device-level entry points
    /// * `version` - Device API version, as from `vk::make_api_version()`
    /// * `enabled_extensions` - Extensions the device was created with
    ///
    /// The render pass creation strategy is picked here: `Vulkan12` on 1.2+
    /// devices, `Khr` if `VK_KHR_create_renderpass2` is enabled and
    /// `Default` otherwise.
    pub fn new(
        dispatch: impl DeviceDispatch + 'static,
        version: u32,
        enabled_extensions: &[&CStr],
    ) -> Self {
        let enabled_extensions: Vec<CString> =
            enabled_extensions.iter().map(|name| CString::from(*name)).collect();

        let render_pass_implementation = if Self::version_at_least(version, 1, 2) {
            RenderPassCreateImplementation::Vulkan12
        } else if enabled_extensions
            .iter()
            .any(|name| name.as_c_str() == ash::khr::create_renderpass2::NAME)
        {
            RenderPassCreateImplementation::Khr
        } else {
            RenderPassCreateImplementation::Default
        };

        crate::forge_debug!(
            Self::SOURCE,
            "Vulkan {}.{} device with {} extensions, render passes through {:?}",
            vk::api_version_major(version),
            vk::api_version_minor(version),
            enabled_extensions.len(),
            render_pass_implementation
        );

        Self {
            dispatch: Box::new(dispatch),
            version,
            enabled_extensions,
            render_pass_implementation,
        }
    }

    /// Force a render pass creation strategy
    pub fn with_render_pass_implementation(mut self, implementation: RenderPassCreateImplementation) -> Self {
        self.render_pass_implementation = implementation;
        self
    }

    fn version_at_least(version: u32, major: u32, minor: u32) -> bool {
        (vk::api_version_major(version), vk::api_version_minor(version)) >= (major, minor)
    }

    /// Device API version
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Whether the device version is at least `version`, ignoring patch
    /// and variant
    pub fn is_version_supported(&self, version: u32) -> bool {
        Self::version_at_least(
            self.version,
            vk::api_version_major(version),
            vk::api_version_minor(version),
        )
    }

    pub fn is_extension_enabled(&self, name: &CStr) -> bool {
        self.enabled_extensions.iter().any(|enabled| enabled.as_c_str() == name)
    }

    pub fn render_pass_implementation(&self) -> RenderPassCreateImplementation {
        self.render_pass_implementation
    }

    pub fn dispatch(&self) -> &dyn DeviceDispatch {
        self.dispatch.as_ref()
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("version", &format_args!(
                "{}.{}.{}",
                vk::api_version_major(self.version),
                vk::api_version_minor(self.version),
                vk::api_version_patch(self.version)
            ))
            .field("enabled_extensions", &self.enabled_extensions)
            .field("render_pass_implementation", &self.render_pass_implementation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
