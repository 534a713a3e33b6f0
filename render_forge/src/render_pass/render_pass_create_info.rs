/// Render pass creation info
///
/// Aggregates attachments, subpasses and dependencies. The subpass list is
/// append-only. Both Vulkan views are generated from the owned storage on
/// every request, so a view is never stale after an append.

use ash::vk;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};

use crate::render_pass::attachment::{to_vk_attachment_description, AttachmentDescription};
use crate::render_pass::legacy_block::LegacyBlock;
use crate::render_pass::subpass::{to_vk_subpass_dependency, SubpassDependency, SubpassDescription};
use crate::render_pass::{raw_slice, slice_ptr};

// Flattened layout: header, subpass headers, attachments, dependencies, then
// the attachment reference records of every subpass. Each record type must
// start aligned right after the previous one.
const _: () = {
    assert!(size_of::<vk::RenderPassCreateInfo>() % align_of::<vk::SubpassDescription>() == 0);
    assert!(size_of::<vk::SubpassDescription>() % align_of::<vk::AttachmentDescription>() == 0);
    assert!(size_of::<vk::AttachmentDescription>() % align_of::<vk::SubpassDependency>() == 0);
    assert!(size_of::<vk::SubpassDependency>() % align_of::<vk::AttachmentReference>() == 0);
    assert!(size_of::<vk::AttachmentDescription>() % align_of::<vk::AttachmentReference>() == 0);
    assert!(size_of::<vk::SubpassDescription>() % align_of::<vk::AttachmentReference>() == 0);
};

/// Render pass creation info
///
/// # Example
///
/// ```no_run
/// use render_forge::forge::render_pass::*;
/// use ash::vk;
///
/// let mut info = RenderPassCreateInfo::new();
/// info.set_attachments(&[AttachmentDescription::new(
///     vk::Format::R8G8B8A8_SRGB,
///     LoadOp::Clear,
///     StoreOp::Store,
///     ImageLayout::Undefined,
///     ImageLayout::PresentSrc,
///     1,
/// )]);
///
/// let mut subpass = SubpassDescription::new();
/// subpass.set_color_attachments(&[AttachmentReference::new(0, ImageLayout::ColorAttachment)], &[]);
/// info.add_subpass(subpass);
///
/// let legacy = info.vk_render_pass_create_info();
/// assert_eq!(legacy.as_raw().subpass_count, 1);
/// ```
#[derive(Debug)]
pub struct RenderPassCreateInfo {
    /// Type tag, flags and `p_next`; counts and array pointers are filled
    /// in by the views
    info: vk::RenderPassCreateInfo2<'static>,
    attachments: Vec<AttachmentDescription>,
    subpasses: Vec<SubpassDescription>,
    dependencies: Vec<SubpassDependency>,
    correlated_view_masks: Vec<u32>,
}

impl RenderPassCreateInfo {
    const SOURCE: &'static str = "forge::RenderPassCreateInfo";

    pub fn new() -> Self {
        Self::with_flags(vk::RenderPassCreateFlags::empty())
    }

    pub fn with_flags(flags: vk::RenderPassCreateFlags) -> Self {
        Self::from_base(vk::RenderPassCreateInfo2::default().flags(flags))
    }

    fn from_base(info: vk::RenderPassCreateInfo2<'static>) -> Self {
        Self {
            info,
            attachments: Vec::new(),
            subpasses: Vec::new(),
            dependencies: Vec::new(),
            correlated_view_masks: Vec::new(),
        }
    }

    /// Deep copy of a `vk::RenderPassCreateInfo2`
    ///
    /// `p_next` chains of the info and of every substructure are copied as
    /// raw pointers, the arrays are copied into owned storage.
    ///
    /// # Safety
    ///
    /// Every non-null array pointer has to be valid for the count next to it,
    /// recursively for the subpass descriptions.
    pub unsafe fn from_vk2(info: &vk::RenderPassCreateInfo2<'_>) -> Self {
        let mut base = vk::RenderPassCreateInfo2::default().flags(info.flags);
        base.s_type = info.s_type;
        base.p_next = info.p_next;

        let mut out = Self::from_base(base);
        out.attachments = raw_slice(info.p_attachments, info.attachment_count)
            .iter()
            .map(AttachmentDescription::from_vk2)
            .collect();
        for subpass in raw_slice(info.p_subpasses, info.subpass_count) {
            out.add_subpass(SubpassDescription::from_vk2(subpass));
        }
        out.dependencies = raw_slice(info.p_dependencies, info.dependency_count)
            .iter()
            .map(SubpassDependency::from_vk2)
            .collect();
        out.correlated_view_masks =
            raw_slice(info.p_correlated_view_masks, info.correlated_view_mask_count).to_vec();
        out
    }

    /// Promote a "version 1" `vk::RenderPassCreateInfo`
    ///
    /// `p_next` is kept, every substructure is converted to its "version 2"
    /// counterpart.
    ///
    /// # Safety
    ///
    /// Same requirements as [`from_vk2()`](Self::from_vk2).
    pub unsafe fn from_vk(info: &vk::RenderPassCreateInfo<'_>) -> Self {
        let mut base = vk::RenderPassCreateInfo2::default().flags(info.flags);
        base.p_next = info.p_next;

        let mut out = Self::from_base(base);
        out.attachments = raw_slice(info.p_attachments, info.attachment_count)
            .iter()
            .map(AttachmentDescription::from_vk)
            .collect();
        for subpass in raw_slice(info.p_subpasses, info.subpass_count) {
            out.add_subpass(SubpassDescription::from_vk(subpass));
        }
        out.dependencies = raw_slice(info.p_dependencies, info.dependency_count)
            .iter()
            .map(SubpassDependency::from_vk)
            .collect();
        out
    }

    /// Replace all attachment descriptions
    pub fn set_attachments(&mut self, attachments: &[AttachmentDescription]) -> &mut Self {
        self.attachments = attachments.to_vec();
        self
    }

    /// Append a subpass, taking ownership of it
    pub fn add_subpass(&mut self, subpass: SubpassDescription) -> &mut Self {
        self.subpasses.push(subpass);
        self
    }

    /// Replace all subpass dependencies
    pub fn set_dependencies(&mut self, dependencies: &[SubpassDependency]) -> &mut Self {
        self.dependencies = dependencies.to_vec();
        self
    }

    /// Replace the correlated view masks
    ///
    /// Only the "version 2" view carries them.
    pub fn set_correlated_view_masks(&mut self, masks: impl Into<Vec<u32>>) -> &mut Self {
        self.correlated_view_masks = masks.into();
        self
    }

    pub fn flags(&self) -> vk::RenderPassCreateFlags {
        self.info.flags
    }

    pub fn attachments(&self) -> &[AttachmentDescription] {
        &self.attachments
    }

    pub fn subpasses(&self) -> &[SubpassDescription] {
        &self.subpasses
    }

    pub fn subpass_count(&self) -> usize {
        self.subpasses.len()
    }

    pub fn dependencies(&self) -> &[SubpassDependency] {
        &self.dependencies
    }

    pub fn correlated_view_masks(&self) -> &[u32] {
        &self.correlated_view_masks
    }

    /// The `vk::RenderPassCreateInfo2` view
    ///
    /// Attachments and dependencies point directly into this info, the
    /// subpass structures are regenerated and owned by the view.
    pub fn vk_render_pass_create_info2(&self) -> RenderPassCreateInfo2View<'_> {
        let subpasses: Vec<vk::SubpassDescription2<'_>> = self
            .subpasses
            .iter()
            .map(SubpassDescription::vk_subpass_description2)
            .collect();

        let mut info: vk::RenderPassCreateInfo2<'_> = self.info;
        info.attachment_count = self.attachments.len() as u32;
        info.p_attachments = slice_ptr(&self.attachments).cast();
        info.subpass_count = subpasses.len() as u32;
        info.p_subpasses = slice_ptr(&subpasses);
        info.dependency_count = self.dependencies.len() as u32;
        info.p_dependencies = slice_ptr(&self.dependencies).cast();
        info.correlated_view_mask_count = self.correlated_view_masks.len() as u32;
        info.p_correlated_view_masks = slice_ptr(&self.correlated_view_masks);

        RenderPassCreateInfo2View { subpasses, info }
    }

    /// Flatten into a "version 1" `vk::RenderPassCreateInfo`
    ///
    /// The header, all subpass headers, attachment descriptions, dependencies
    /// and attachment reference records are written into one allocation, in
    /// that order. `p_next` and the preserve attachment arrays still point
    /// into this info, which stays borrowed. Correlated view masks and view
    /// offsets have no "version 1" counterpart and are dropped.
    pub fn vk_render_pass_create_info(&self) -> LegacyRenderPassCreateInfo<'_> {
        let header_size = size_of::<vk::RenderPassCreateInfo>();
        let subpasses_size = size_of::<vk::SubpassDescription>() * self.subpasses.len();
        let attachments_size = size_of::<vk::AttachmentDescription>() * self.attachments.len();
        let dependencies_size = size_of::<vk::SubpassDependency>() * self.dependencies.len();
        let structures_end = header_size + subpasses_size + attachments_size + dependencies_size;
        let extras_size: usize = self
            .subpasses
            .iter()
            .map(SubpassDescription::legacy_extras_size)
            .sum();

        let block = LegacyBlock::zeroed(structures_end + extras_size);

        let mut info = vk::RenderPassCreateInfo::default().flags(self.info.flags);
        info.p_next = self.info.p_next;
        info.attachment_count = self.attachments.len() as u32;
        info.subpass_count = self.subpasses.len() as u32;
        info.dependency_count = self.dependencies.len() as u32;

        unsafe {
            let mut offset = header_size;
            let mut extras_offset = structures_end;

            if !self.subpasses.is_empty() {
                info.p_subpasses = block.as_ptr().add(offset).cast();
            }
            for subpass in &self.subpasses {
                let extras = block.as_ptr().add(extras_offset).cast::<vk::AttachmentReference>();
                let (description, written) = subpass.write_legacy_description(extras);
                block.write(offset, description);
                offset += size_of::<vk::SubpassDescription>();
                extras_offset += written;
            }
            debug_assert_eq!(extras_offset, block.len());

            if !self.attachments.is_empty() {
                info.p_attachments = block.as_ptr().add(offset).cast();
            }
            for attachment in &self.attachments {
                block.write(offset, to_vk_attachment_description(attachment.as_vk2()));
                offset += size_of::<vk::AttachmentDescription>();
            }

            if !self.dependencies.is_empty() {
                info.p_dependencies = block.as_ptr().add(offset).cast();
            }
            for dependency in &self.dependencies {
                block.write(offset, to_vk_subpass_dependency(dependency.as_vk2()));
                offset += size_of::<vk::SubpassDependency>();
            }
            debug_assert_eq!(offset, structures_end);

            block.write(0, info);
        }

        crate::forge_trace!(
            Self::SOURCE,
            "flattened {} attachments, {} subpasses, {} dependencies into {} bytes",
            self.attachments.len(),
            self.subpasses.len(),
            self.dependencies.len(),
            block.len()
        );

        LegacyRenderPassCreateInfo {
            block,
            _info: PhantomData,
        }
    }
}

impl Default for RenderPassCreateInfo {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Views
// ============================================================================

/// A `vk::RenderPassCreateInfo2` referencing a [`RenderPassCreateInfo`]
pub struct RenderPassCreateInfo2View<'a> {
    subpasses: Vec<vk::SubpassDescription2<'a>>,
    info: vk::RenderPassCreateInfo2<'a>,
}

impl<'a> RenderPassCreateInfo2View<'a> {
    pub fn as_raw(&self) -> &vk::RenderPassCreateInfo2<'_> {
        &self.info
    }

    /// The regenerated subpass structures `as_raw().p_subpasses` points to
    pub fn subpasses(&self) -> &[vk::SubpassDescription2<'a>] {
        &self.subpasses
    }
}

/// A flattened "version 1" `vk::RenderPassCreateInfo`
///
/// Owns one contiguous block holding the header and every structure it
/// points to, except for `p_next` chains and preserve attachment arrays,
/// which refer to the borrowed [`RenderPassCreateInfo`]. Dropping it
/// releases the block.
pub struct LegacyRenderPassCreateInfo<'a> {
    block: LegacyBlock,
    _info: PhantomData<&'a RenderPassCreateInfo>,
}

impl<'a> LegacyRenderPassCreateInfo<'a> {
    /// The header structure, ready to be passed to `vkCreateRenderPass`
    pub fn as_raw(&self) -> &vk::RenderPassCreateInfo<'_> {
        unsafe { &*self.block.as_ptr().cast::<vk::RenderPassCreateInfo<'_>>() }
    }

    pub fn attachments(&self) -> &[vk::AttachmentDescription] {
        let info = self.as_raw();
        unsafe { raw_slice(info.p_attachments, info.attachment_count) }
    }

    pub fn subpasses(&self) -> &[vk::SubpassDescription<'_>] {
        let info = self.as_raw();
        unsafe { raw_slice(info.p_subpasses, info.subpass_count) }
    }

    pub fn dependencies(&self) -> &[vk::SubpassDependency] {
        let info = self.as_raw();
        unsafe { raw_slice(info.p_dependencies, info.dependency_count) }
    }

    /// Total size of the block in bytes
    pub fn size(&self) -> usize {
        self.block.len()
    }

    /// Start of the block
    pub fn as_ptr(&self) -> *const u8 {
        self.block.as_ptr()
    }
}

#[cfg(test)]
#[path = "render_pass_create_info_tests.rs"]
mod tests;
