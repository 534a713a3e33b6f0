/// RenderPass - owning wrapper around a `vk::RenderPass`

use ash::vk;
use std::mem;

use crate::device::{Device, RenderPassCreateImplementation};
use crate::error::{Error, Result};
use crate::handle::HandleFlags;
use crate::render_pass::render_pass_create_info::RenderPassCreateInfo;

/// Vulkan render pass
///
/// Created from a [`RenderPassCreateInfo`] through the strategy the device
/// picked, or adopted from an existing handle with [`wrap()`](Self::wrap).
/// The handle is destroyed on drop only if `DESTROY_ON_DESTRUCTION` is set.
#[derive(Debug)]
pub struct RenderPass<'a> {
    /// Device the handle belongs to (for cleanup)
    device: Option<&'a Device>,
    handle: vk::RenderPass,
    flags: HandleFlags,
}

impl<'a> RenderPass<'a> {
    const SOURCE: &'static str = "forge::RenderPass";

    /// Create a render pass
    ///
    /// The info has to contain at least one subpass. Creation failures are
    /// logged and returned.
    pub fn new(device: &'a Device, info: &RenderPassCreateInfo) -> Result<Self> {
        crate::forge_assert!(
            info.subpass_count() != 0,
            Self::SOURCE,
            Err(Error::PreconditionFailed(
                "render pass needs at least one subpass".to_string()
            )),
            "RenderPass::new(): needs to be created with at least one subpass"
        );

        let implementation = device.render_pass_implementation();
        let result = unsafe {
            match implementation {
                RenderPassCreateImplementation::Default => {
                    let legacy = info.vk_render_pass_create_info();
                    device.dispatch().create_render_pass(legacy.as_raw())
                }
                RenderPassCreateImplementation::Khr => {
                    let view = info.vk_render_pass_create_info2();
                    device.dispatch().create_render_pass2_khr(view.as_raw())
                }
                RenderPassCreateImplementation::Vulkan12 => {
                    let view = info.vk_render_pass_create_info2();
                    device.dispatch().create_render_pass2(view.as_raw())
                }
            }
        };

        let handle = result.map_err(|result| match Error::from(result) {
            Error::OutOfMemory => {
                crate::forge_error!(
                    Self::SOURCE,
                    "Out of memory creating render pass through {:?}: {:?}",
                    implementation,
                    result
                );
                Error::OutOfMemory
            }
            _ => crate::forge_err!(
                Self::SOURCE,
                "Failed to create render pass through {:?}: {:?}",
                implementation,
                result
            ),
        })?;

        crate::forge_debug!(
            Self::SOURCE,
            "Created render pass {:?} ({} attachments, {} subpasses, {} dependencies)",
            handle,
            info.attachments().len(),
            info.subpass_count(),
            info.dependencies().len()
        );

        Ok(Self {
            device: Some(device),
            handle,
            flags: HandleFlags::DESTROY_ON_DESTRUCTION,
        })
    }

    /// Adopt an existing handle
    ///
    /// Unlike a render pass created with [`new()`](Self::new), the handle is
    /// not destroyed on drop unless `flags` contains
    /// `DESTROY_ON_DESTRUCTION`.
    pub fn wrap(device: &'a Device, handle: vk::RenderPass, flags: HandleFlags) -> Self {
        Self {
            device: Some(device),
            handle,
            flags,
        }
    }

    /// A render pass without a device or handle
    ///
    /// Dropping it does nothing.
    pub fn no_create() -> Self {
        Self {
            device: None,
            handle: vk::RenderPass::null(),
            flags: HandleFlags::empty(),
        }
    }

    pub fn handle(&self) -> vk::RenderPass {
        self.handle
    }

    pub fn handle_flags(&self) -> HandleFlags {
        self.flags
    }

    pub fn device(&self) -> Option<&'a Device> {
        self.device
    }

    /// Give up ownership of the handle
    ///
    /// The wrapper is left without a handle, so dropping it is a no-op. The
    /// caller becomes responsible for destroying the returned handle.
    pub fn release(&mut self) -> vk::RenderPass {
        self.flags = HandleFlags::empty();
        mem::replace(&mut self.handle, vk::RenderPass::null())
    }
}

impl Default for RenderPass<'_> {
    fn default() -> Self {
        Self::no_create()
    }
}

impl Drop for RenderPass<'_> {
    fn drop(&mut self) {
        if self.handle == vk::RenderPass::null() || !self.flags.contains(HandleFlags::DESTROY_ON_DESTRUCTION) {
            return;
        }
        if let Some(device) = self.device {
            unsafe {
                device.dispatch().destroy_render_pass(self.handle);
            }
        }
    }
}

#[cfg(test)]
#[path = "render_pass_tests.rs"]
mod tests;
