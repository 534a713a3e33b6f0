/// VulkanDeviceDispatch - DeviceDispatch on top of ash

use ash::prelude::VkResult;
use ash::vk;
use render_forge::forge::DeviceDispatch;

/// Device-level entry points loaded by ash
///
/// `vkCreateRenderPass2KHR` is only available if the device was created with
/// `VK_KHR_create_renderpass2`, otherwise calling it fails with
/// `ERROR_EXTENSION_NOT_PRESENT`. The device itself is not destroyed here.
pub struct VulkanDeviceDispatch {
    device: ash::Device,
    create_renderpass2: Option<ash::khr::create_renderpass2::Device>,
}

impl VulkanDeviceDispatch {
    /// Load the entry points of `device`
    ///
    /// # Arguments
    ///
    /// * `instance` - Instance the device was created from
    /// * `device` - Logical device
    /// * `create_renderpass2_enabled` - Whether `VK_KHR_create_renderpass2`
    ///   was enabled on the device
    pub fn new(instance: &ash::Instance, device: &ash::Device, create_renderpass2_enabled: bool) -> Self {
        Self {
            device: device.clone(),
            create_renderpass2: create_renderpass2_enabled
                .then(|| ash::khr::create_renderpass2::Device::new(instance, device)),
        }
    }

    pub fn raw(&self) -> &ash::Device {
        &self.device
    }
}

impl DeviceDispatch for VulkanDeviceDispatch {
    unsafe fn create_render_pass(&self, info: &vk::RenderPassCreateInfo<'_>) -> VkResult<vk::RenderPass> {
        self.device.create_render_pass(info, None)
    }

    unsafe fn create_render_pass2_khr(&self, info: &vk::RenderPassCreateInfo2<'_>) -> VkResult<vk::RenderPass> {
        match &self.create_renderpass2 {
            Some(loader) => loader.create_render_pass2(info, None),
            None => Err(vk::Result::ERROR_EXTENSION_NOT_PRESENT),
        }
    }

    unsafe fn create_render_pass2(&self, info: &vk::RenderPassCreateInfo2<'_>) -> VkResult<vk::RenderPass> {
        self.device.create_render_pass2(info, None)
    }

    unsafe fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        self.device.destroy_render_pass(render_pass, None);
    }

    unsafe fn create_shader_module(&self, info: &vk::ShaderModuleCreateInfo<'_>) -> VkResult<vk::ShaderModule> {
        self.device.create_shader_module(info, None)
    }

    unsafe fn destroy_shader_module(&self, module: vk::ShaderModule) {
        self.device.destroy_shader_module(module, None);
    }
}
