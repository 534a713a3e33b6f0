/// Shader modules
///
/// `ShaderCreateInfo` owns SPIR-V code as 32-bit words, `Shader` owns the
/// resulting `vk::ShaderModule` with the same ownership rules as
/// [`RenderPass`](crate::render_pass::RenderPass).

use ash::vk;
use std::mem;

use crate::device::Device;
use crate::error::{Error, Result};
use crate::handle::HandleFlags;

/// First word of every SPIR-V module
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Shader module creation info
#[derive(Debug, Clone, Default)]
pub struct ShaderCreateInfo {
    code: Vec<u32>,
    flags: vk::ShaderModuleCreateFlags,
}

impl ShaderCreateInfo {
    const SOURCE: &'static str = "forge::ShaderCreateInfo";

    /// Create from SPIR-V words
    pub fn new(code: &[u32]) -> Self {
        Self {
            code: code.to_vec(),
            flags: vk::ShaderModuleCreateFlags::empty(),
        }
    }

    /// Create from a SPIR-V binary, e.g. the contents of a `.spv` file
    ///
    /// The byte length has to be a multiple of four. The data doesn't need
    /// to be aligned. Fails with `Error::InvalidResource` if the first word
    /// isn't the SPIR-V magic number.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        crate::forge_assert!(
            bytes.len() % 4 == 0,
            Self::SOURCE,
            Err(Error::PreconditionFailed(format!(
                "SPIR-V size {} is not a multiple of four",
                bytes.len()
            ))),
            "ShaderCreateInfo::from_bytes(): expected size to be a multiple of four, got {}",
            bytes.len()
        );

        let code: Vec<u32> = bytes
            .chunks_exact(mem::size_of::<u32>())
            .map(bytemuck::pod_read_unaligned::<u32>)
            .collect();

        if code.first() != Some(&SPIRV_MAGIC) {
            crate::forge_error!(
                Self::SOURCE,
                "Invalid SPIR-V: expected magic {:#010x}, got {:?}",
                SPIRV_MAGIC,
                code.first()
            );
            return Err(Error::InvalidResource(format!(
                "not a SPIR-V module ({} bytes)",
                bytes.len()
            )));
        }

        Ok(Self {
            code,
            flags: vk::ShaderModuleCreateFlags::empty(),
        })
    }

    pub fn with_flags(mut self, flags: vk::ShaderModuleCreateFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn code(&self) -> &[u32] {
        &self.code
    }

    /// Code size in bytes
    pub fn code_size(&self) -> usize {
        mem::size_of_val(self.code.as_slice())
    }

    pub fn vk_shader_module_create_info(&self) -> vk::ShaderModuleCreateInfo<'_> {
        vk::ShaderModuleCreateInfo::default()
            .flags(self.flags)
            .code(&self.code)
    }
}

/// Vulkan shader module
#[derive(Debug)]
pub struct Shader<'a> {
    /// Device the handle belongs to (for cleanup)
    device: Option<&'a Device>,
    handle: vk::ShaderModule,
    flags: HandleFlags,
}

impl<'a> Shader<'a> {
    const SOURCE: &'static str = "forge::Shader";

    /// Create a shader module
    pub fn new(device: &'a Device, info: &ShaderCreateInfo) -> Result<Self> {
        let handle = unsafe {
            device
                .dispatch()
                .create_shader_module(&info.vk_shader_module_create_info())
        }
        .map_err(|result| match Error::from(result) {
            Error::OutOfMemory => {
                crate::forge_error!(Self::SOURCE, "Out of memory creating shader module: {:?}", result);
                Error::OutOfMemory
            }
            _ => crate::forge_err!(Self::SOURCE, "Failed to create shader module: {:?}", result),
        })?;

        crate::forge_debug!(
            Self::SOURCE,
            "Created shader module {:?} ({} bytes)",
            handle,
            info.code_size()
        );

        Ok(Self {
            device: Some(device),
            handle,
            flags: HandleFlags::DESTROY_ON_DESTRUCTION,
        })
    }

    /// Adopt an existing handle, destroyed on drop only if `flags` say so
    pub fn wrap(device: &'a Device, handle: vk::ShaderModule, flags: HandleFlags) -> Self {
        Self {
            device: Some(device),
            handle,
            flags,
        }
    }

    pub fn no_create() -> Self {
        Self {
            device: None,
            handle: vk::ShaderModule::null(),
            flags: HandleFlags::empty(),
        }
    }

    pub fn handle(&self) -> vk::ShaderModule {
        self.handle
    }

    pub fn handle_flags(&self) -> HandleFlags {
        self.flags
    }

    /// Give up ownership of the handle
    pub fn release(&mut self) -> vk::ShaderModule {
        self.flags = HandleFlags::empty();
        mem::replace(&mut self.handle, vk::ShaderModule::null())
    }
}

impl Default for Shader<'_> {
    fn default() -> Self {
        Self::no_create()
    }
}

impl Drop for Shader<'_> {
    fn drop(&mut self) {
        if self.handle == vk::ShaderModule::null() || !self.flags.contains(HandleFlags::DESTROY_ON_DESTRUCTION) {
            return;
        }
        if let Some(device) = self.device {
            unsafe {
                device.dispatch().destroy_shader_module(self.handle);
            }
        }
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
