//! Render pass description and creation
//!
//! Descriptions are always stored in the "version 2" Vulkan layout
//! (`VkRenderPassCreateInfo2` and friends) and projected down to the
//! "version 1" layout on request.

mod attachment;
mod legacy_block;
#[allow(clippy::module_inception)]
mod render_pass;
mod render_pass_create_info;
mod subpass;

pub use attachment::{
    AttachmentDescription, AttachmentDescriptionFlags, AttachmentReference, ImageLayout, LoadOp,
    StoreOp,
};
pub use render_pass::RenderPass;
pub use render_pass_create_info::{
    LegacyRenderPassCreateInfo, RenderPassCreateInfo, RenderPassCreateInfo2View,
};
pub use subpass::{LegacySubpassDescription, SubpassDependency, SubpassDescription};

/// Pointer to the first element, null for an empty slice
pub(crate) fn slice_ptr<T>(slice: &[T]) -> *const T {
    if slice.is_empty() {
        std::ptr::null()
    } else {
        slice.as_ptr()
    }
}

/// Slice over a raw array, empty if `data` is null or `count` is zero
///
/// # Safety
///
/// A non-null `data` has to be valid for `count` reads for the whole `'a`.
pub(crate) unsafe fn raw_slice<'a, T>(data: *const T, count: u32) -> &'a [T] {
    if data.is_null() || count == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(data, count as usize)
    }
}
