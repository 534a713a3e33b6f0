/// Mock device dispatch for unit tests (no GPU required)
///
/// Records every call together with a snapshot of the structure it got, and
/// hands out increasing fake handles. A failure status can be configured for
/// all creation calls.

use ash::prelude::VkResult;
use ash::vk::{self, Handle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::device::DeviceDispatch;
use crate::render_pass::raw_slice;

/// What a creation call saw in its create info
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPassSnapshot {
    pub attachment_count: u32,
    pub subpass_count: u32,
    pub dependency_count: u32,
    /// Color attachment indices of every subpass
    pub color_attachments: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CreateRenderPass(RenderPassSnapshot),
    CreateRenderPass2Khr(RenderPassSnapshot),
    CreateRenderPass2(RenderPassSnapshot),
    DestroyRenderPass(vk::RenderPass),
    CreateShaderModule { code_size: usize },
    DestroyShaderModule(vk::ShaderModule),
}

/// Mock dispatch table that tracks calls without a GPU
pub struct MockDeviceDispatch {
    /// Shared with the test so calls can be inspected after the dispatch was
    /// moved into a `Device`
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    /// Status returned by every creation call, if set
    pub fail_with: Option<vk::Result>,
    next_handle: AtomicU64,
}

impl MockDeviceDispatch {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            next_handle: AtomicU64::new(0x1000),
        }
    }

    pub fn failing(result: vk::Result) -> Self {
        Self {
            fail_with: Some(result),
            ..Self::new()
        }
    }

    /// Shared call log
    pub fn calls(&self) -> Arc<Mutex<Vec<MockCall>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_raw_handle(&self) -> u64 {
        self.next_handle.fetch_add(1, Ordering::Relaxed)
    }

    fn create<T: Handle>(&self, call: MockCall) -> VkResult<T> {
        self.record(call);
        match self.fail_with {
            Some(result) => Err(result),
            None => Ok(T::from_raw(self.next_raw_handle())),
        }
    }

    unsafe fn snapshot(info: &vk::RenderPassCreateInfo<'_>) -> RenderPassSnapshot {
        RenderPassSnapshot {
            attachment_count: info.attachment_count,
            subpass_count: info.subpass_count,
            dependency_count: info.dependency_count,
            color_attachments: raw_slice(info.p_subpasses, info.subpass_count)
                .iter()
                .map(|subpass| {
                    raw_slice(subpass.p_color_attachments, subpass.color_attachment_count)
                        .iter()
                        .map(|reference| reference.attachment)
                        .collect()
                })
                .collect(),
        }
    }

    unsafe fn snapshot2(info: &vk::RenderPassCreateInfo2<'_>) -> RenderPassSnapshot {
        RenderPassSnapshot {
            attachment_count: info.attachment_count,
            subpass_count: info.subpass_count,
            dependency_count: info.dependency_count,
            color_attachments: raw_slice(info.p_subpasses, info.subpass_count)
                .iter()
                .map(|subpass| {
                    raw_slice(subpass.p_color_attachments, subpass.color_attachment_count)
                        .iter()
                        .map(|reference| reference.attachment)
                        .collect()
                })
                .collect(),
        }
    }
}

impl DeviceDispatch for MockDeviceDispatch {
    unsafe fn create_render_pass(&self, info: &vk::RenderPassCreateInfo<'_>) -> VkResult<vk::RenderPass> {
        self.create(MockCall::CreateRenderPass(Self::snapshot(info)))
    }

    unsafe fn create_render_pass2_khr(&self, info: &vk::RenderPassCreateInfo2<'_>) -> VkResult<vk::RenderPass> {
        self.create(MockCall::CreateRenderPass2Khr(Self::snapshot2(info)))
    }

    unsafe fn create_render_pass2(&self, info: &vk::RenderPassCreateInfo2<'_>) -> VkResult<vk::RenderPass> {
        self.create(MockCall::CreateRenderPass2(Self::snapshot2(info)))
    }

    unsafe fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        self.record(MockCall::DestroyRenderPass(render_pass));
    }

    unsafe fn create_shader_module(&self, info: &vk::ShaderModuleCreateInfo<'_>) -> VkResult<vk::ShaderModule> {
        self.create(MockCall::CreateShaderModule { code_size: info.code_size })
    }

    unsafe fn destroy_shader_module(&self, module: vk::ShaderModule) {
        self.record(MockCall::DestroyShaderModule(module));
    }
}
