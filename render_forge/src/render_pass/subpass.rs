/// Subpass descriptions and subpass dependencies
///
/// A `SubpassDescription` owns all its attachment reference arrays. The Vulkan
/// structures pointing into them are generated on request and borrow the
/// description, so they can't outlive it or observe a later mutation.

use ash::vk;
use std::marker::PhantomData;
use std::mem;

use crate::render_pass::attachment::{to_vk_attachment_reference, AttachmentReference};
use crate::render_pass::legacy_block::LegacyBlock;
use crate::render_pass::{raw_slice, slice_ptr};

// ============================================================================
// SubpassDescription
// ============================================================================

/// Description of one subpass of a render pass
///
/// Every attachment list is stored both as `AttachmentReference` wrappers
/// (which are the `vk::AttachmentReference2` records themselves) and, for
/// input, color and resolve attachments, as the "version 1"
/// `vk::AttachmentReference` records consumed by
/// [`vk_subpass_description()`](Self::vk_subpass_description). Each setter
/// replaces one list and rebuilds both forms together.
#[derive(Debug)]
pub struct SubpassDescription {
    /// Flags, bind point, view mask and `p_next`; counts and array pointers
    /// are never stored here
    description: vk::SubpassDescription2<'static>,
    input_attachments: Vec<AttachmentReference>,
    color_attachments: Vec<AttachmentReference>,
    resolve_attachments: Vec<AttachmentReference>,
    depth_stencil_attachment: Option<AttachmentReference>,
    preserve_attachments: Vec<u32>,
    legacy_input_attachments: Vec<vk::AttachmentReference>,
    legacy_color_attachments: Vec<vk::AttachmentReference>,
    legacy_resolve_attachments: Vec<vk::AttachmentReference>,
}

impl SubpassDescription {
    const SOURCE: &'static str = "forge::SubpassDescription";

    /// Empty graphics subpass
    pub fn new() -> Self {
        Self::with_flags(vk::SubpassDescriptionFlags::empty())
    }

    /// Empty graphics subpass with given flags
    pub fn with_flags(flags: vk::SubpassDescriptionFlags) -> Self {
        Self::from_base(
            vk::SubpassDescription2::default()
                .flags(flags)
                .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS),
        )
    }

    fn from_base(description: vk::SubpassDescription2<'static>) -> Self {
        Self {
            description,
            input_attachments: Vec::new(),
            color_attachments: Vec::new(),
            resolve_attachments: Vec::new(),
            depth_stencil_attachment: None,
            preserve_attachments: Vec::new(),
            legacy_input_attachments: Vec::new(),
            legacy_color_attachments: Vec::new(),
            legacy_resolve_attachments: Vec::new(),
        }
    }

    /// Deep copy of a `vk::SubpassDescription2`
    ///
    /// The flags, bind point, view mask and `p_next` are copied verbatim, all
    /// arrays are copied into owned storage.
    ///
    /// # Safety
    ///
    /// Every non-null array pointer has to be valid for the count next to it,
    /// `p_resolve_attachments` for `color_attachment_count` elements.
    pub unsafe fn from_vk2(description: &vk::SubpassDescription2<'_>) -> Self {
        let mut base = vk::SubpassDescription2::default()
            .flags(description.flags)
            .pipeline_bind_point(description.pipeline_bind_point)
            .view_mask(description.view_mask);
        base.s_type = description.s_type;
        base.p_next = description.p_next;

        let mut out = Self::from_base(base);

        let inputs: Vec<AttachmentReference> =
            raw_slice(description.p_input_attachments, description.input_attachment_count)
                .iter()
                .map(AttachmentReference::from_vk2)
                .collect();
        out.set_input_attachments(&inputs);

        let colors: Vec<AttachmentReference> =
            raw_slice(description.p_color_attachments, description.color_attachment_count)
                .iter()
                .map(AttachmentReference::from_vk2)
                .collect();
        let resolves: Vec<AttachmentReference> =
            raw_slice(description.p_resolve_attachments, description.color_attachment_count)
                .iter()
                .map(AttachmentReference::from_vk2)
                .collect();
        out.set_color_attachments(&colors, &resolves);

        if let Some(depth_stencil) = description.p_depth_stencil_attachment.as_ref() {
            out.set_depth_stencil_attachment(AttachmentReference::from_vk2(depth_stencil));
        }

        out.set_preserve_attachments(raw_slice(
            description.p_preserve_attachments,
            description.preserve_attachment_count,
        ));
        out
    }

    /// Promote a "version 1" `vk::SubpassDescription`
    ///
    /// All attachment references are converted to the "version 2" form.
    ///
    /// # Safety
    ///
    /// Same requirements as [`from_vk2()`](Self::from_vk2).
    pub unsafe fn from_vk(description: &vk::SubpassDescription<'_>) -> Self {
        let mut out = Self::from_base(
            vk::SubpassDescription2::default()
                .flags(description.flags)
                .pipeline_bind_point(description.pipeline_bind_point),
        );

        let inputs: Vec<AttachmentReference> =
            raw_slice(description.p_input_attachments, description.input_attachment_count)
                .iter()
                .map(AttachmentReference::from_vk)
                .collect();
        out.set_input_attachments(&inputs);

        let colors: Vec<AttachmentReference> =
            raw_slice(description.p_color_attachments, description.color_attachment_count)
                .iter()
                .map(AttachmentReference::from_vk)
                .collect();
        let resolves: Vec<AttachmentReference> =
            raw_slice(description.p_resolve_attachments, description.color_attachment_count)
                .iter()
                .map(AttachmentReference::from_vk)
                .collect();
        out.set_color_attachments(&colors, &resolves);

        if let Some(depth_stencil) = description.p_depth_stencil_attachment.as_ref() {
            out.set_depth_stencil_attachment(AttachmentReference::from_vk(depth_stencil));
        }

        out.set_preserve_attachments(raw_slice(
            description.p_preserve_attachments,
            description.preserve_attachment_count,
        ));
        out
    }

    /// Replace the input attachments
    pub fn set_input_attachments(&mut self, attachments: &[AttachmentReference]) -> &mut Self {
        self.input_attachments = attachments.to_vec();
        self.legacy_input_attachments = attachments
            .iter()
            .map(AttachmentReference::vk_attachment_reference)
            .collect();
        self
    }

    /// Replace the color attachments and their resolve attachments
    ///
    /// `resolve_attachments` is either empty or has the same length as
    /// `attachments`, anything else is a precondition violation.
    pub fn set_color_attachments(
        &mut self,
        attachments: &[AttachmentReference],
        resolve_attachments: &[AttachmentReference],
    ) -> &mut Self {
        crate::forge_assert!(
            resolve_attachments.is_empty() || resolve_attachments.len() == attachments.len(),
            Self::SOURCE,
            self,
            "SubpassDescription::set_color_attachments(): resolve attachments expected to be either empty or have a size of {} but got {}",
            attachments.len(),
            resolve_attachments.len()
        );

        self.color_attachments = attachments.to_vec();
        self.resolve_attachments = resolve_attachments.to_vec();
        self.legacy_color_attachments = attachments
            .iter()
            .map(AttachmentReference::vk_attachment_reference)
            .collect();
        self.legacy_resolve_attachments = resolve_attachments
            .iter()
            .map(AttachmentReference::vk_attachment_reference)
            .collect();
        self
    }

    /// Set the depth/stencil attachment
    pub fn set_depth_stencil_attachment(&mut self, attachment: AttachmentReference) -> &mut Self {
        self.depth_stencil_attachment = Some(attachment);
        self
    }

    /// Replace the preserved attachment indices
    ///
    /// Accepts anything convertible to a `Vec<u32>`, passing a `Vec` hands
    /// its storage over without a copy.
    pub fn set_preserve_attachments(&mut self, attachments: impl Into<Vec<u32>>) -> &mut Self {
        self.preserve_attachments = attachments.into();
        self
    }

    pub fn flags(&self) -> vk::SubpassDescriptionFlags {
        self.description.flags
    }

    pub fn pipeline_bind_point(&self) -> vk::PipelineBindPoint {
        self.description.pipeline_bind_point
    }

    pub fn input_attachments(&self) -> &[AttachmentReference] {
        &self.input_attachments
    }

    pub fn color_attachments(&self) -> &[AttachmentReference] {
        &self.color_attachments
    }

    /// Resolve attachments, empty if the subpass doesn't resolve
    pub fn resolve_attachments(&self) -> &[AttachmentReference] {
        &self.resolve_attachments
    }

    pub fn depth_stencil_attachment(&self) -> Option<&AttachmentReference> {
        self.depth_stencil_attachment.as_ref()
    }

    pub fn preserve_attachments(&self) -> &[u32] {
        &self.preserve_attachments
    }

    /// "Version 1" records of the input attachments
    pub fn legacy_input_attachments(&self) -> &[vk::AttachmentReference] {
        &self.legacy_input_attachments
    }

    /// "Version 1" records of the color attachments
    pub fn legacy_color_attachments(&self) -> &[vk::AttachmentReference] {
        &self.legacy_color_attachments
    }

    /// "Version 1" records of the resolve attachments
    pub fn legacy_resolve_attachments(&self) -> &[vk::AttachmentReference] {
        &self.legacy_resolve_attachments
    }

    /// The `vk::SubpassDescription2` pointing into this description
    ///
    /// Pointers of empty lists are null. The resolve pointer is null unless
    /// resolve attachments are set.
    pub fn vk_subpass_description2(&self) -> vk::SubpassDescription2<'_> {
        let mut description = self.description;
        description.input_attachment_count = self.input_attachments.len() as u32;
        description.p_input_attachments = slice_ptr(&self.input_attachments).cast();
        description.color_attachment_count = self.color_attachments.len() as u32;
        description.p_color_attachments = slice_ptr(&self.color_attachments).cast();
        description.p_resolve_attachments = slice_ptr(&self.resolve_attachments).cast();
        description.p_depth_stencil_attachment = match &self.depth_stencil_attachment {
            Some(attachment) => attachment.as_vk2(),
            None => std::ptr::null(),
        };
        description.preserve_attachment_count = self.preserve_attachments.len() as u32;
        description.p_preserve_attachments = slice_ptr(&self.preserve_attachments);
        description
    }

    /// Size of the "version 1" attachment reference records following the
    /// subpass header in flattened output
    ///
    /// One record per input and color attachment, one more per color
    /// attachment if resolve attachments are set and one for the
    /// depth/stencil attachment if present.
    pub fn legacy_extras_size(&self) -> usize {
        mem::size_of::<vk::AttachmentReference>()
            * (self.legacy_input_attachments.len()
                + self.legacy_color_attachments.len()
                + self.legacy_resolve_attachments.len()
                + usize::from(self.depth_stencil_attachment.is_some()))
    }

    /// Write the "version 1" attachment reference records to `out`
    ///
    /// Returns the "version 1" header pointing to them, and the number of
    /// bytes written, equal to [`legacy_extras_size()`](Self::legacy_extras_size).
    /// The preserve attachment pointer of the header points into `self`.
    ///
    /// # Safety
    ///
    /// `out` has to be aligned for `vk::AttachmentReference` and valid for
    /// writes of `legacy_extras_size()` bytes.
    pub(crate) unsafe fn write_legacy_description(
        &self,
        out: *mut vk::AttachmentReference,
    ) -> (vk::SubpassDescription<'_>, usize) {
        let mut description = vk::SubpassDescription::default()
            .flags(self.description.flags)
            .pipeline_bind_point(self.description.pipeline_bind_point);
        description.input_attachment_count = self.legacy_input_attachments.len() as u32;
        description.color_attachment_count = self.legacy_color_attachments.len() as u32;
        description.preserve_attachment_count = self.preserve_attachments.len() as u32;
        description.p_preserve_attachments = slice_ptr(&self.preserve_attachments);

        let mut offset = 0;
        if !self.legacy_input_attachments.is_empty() {
            description.p_input_attachments = out.add(offset);
            copy_records(&self.legacy_input_attachments, out.add(offset));
            offset += self.legacy_input_attachments.len();
        }
        if !self.legacy_color_attachments.is_empty() {
            description.p_color_attachments = out.add(offset);
            copy_records(&self.legacy_color_attachments, out.add(offset));
            offset += self.legacy_color_attachments.len();
        }
        if !self.legacy_resolve_attachments.is_empty() {
            description.p_resolve_attachments = out.add(offset);
            copy_records(&self.legacy_resolve_attachments, out.add(offset));
            offset += self.legacy_resolve_attachments.len();
        }
        if let Some(depth_stencil) = &self.depth_stencil_attachment {
            description.p_depth_stencil_attachment = out.add(offset);
            out.add(offset).write(to_vk_attachment_reference(depth_stencil.as_vk2()));
            offset += 1;
        }

        (description, offset * mem::size_of::<vk::AttachmentReference>())
    }

    /// Flatten into a "version 1" `vk::SubpassDescription`
    ///
    /// The header and all attachment reference records it points to live in
    /// one allocation owned by the returned value.
    pub fn vk_subpass_description(&self) -> LegacySubpassDescription<'_> {
        let header_size = mem::size_of::<vk::SubpassDescription>();
        let extras_size = self.legacy_extras_size();
        let block = LegacyBlock::zeroed(header_size + extras_size);

        // The header size is a multiple of its pointer alignment, so the
        // records right after it are aligned as well
        unsafe {
            let extras = block.as_ptr().add(header_size).cast::<vk::AttachmentReference>();
            let (header, written) = self.write_legacy_description(extras);
            debug_assert_eq!(written, extras_size);
            block.write(0, header);
        }

        LegacySubpassDescription {
            block,
            extras_size,
            _subpass: PhantomData,
        }
    }
}

impl Default for SubpassDescription {
    fn default() -> Self {
        Self::new()
    }
}

unsafe fn copy_records(records: &[vk::AttachmentReference], out: *mut vk::AttachmentReference) {
    std::ptr::copy_nonoverlapping(records.as_ptr(), out, records.len());
}

/// A flattened "version 1" subpass description
///
/// Owns one block holding the `vk::SubpassDescription` header followed by the
/// attachment reference records it points to. The preserve attachment
/// pointer refers to the originating [`SubpassDescription`], which stays
/// borrowed.
pub struct LegacySubpassDescription<'a> {
    block: LegacyBlock,
    extras_size: usize,
    _subpass: PhantomData<&'a SubpassDescription>,
}

impl<'a> LegacySubpassDescription<'a> {
    /// The header structure
    pub fn as_raw(&self) -> &vk::SubpassDescription<'_> {
        unsafe { &*self.block.as_ptr().cast::<vk::SubpassDescription<'_>>() }
    }

    /// Bytes of attachment reference records following the header
    pub fn extras_size(&self) -> usize {
        self.extras_size
    }

    /// Total size of the block
    pub fn size(&self) -> usize {
        self.block.len()
    }
}

// ============================================================================
// SubpassDependency
// ============================================================================

/// Execution and memory dependency between two subpasses
///
/// Wraps a `vk::SubpassDependency2`.
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct SubpassDependency {
    dependency: vk::SubpassDependency2<'static>,
}

impl SubpassDependency {
    /// Subpass index referring to commands outside of the render pass
    pub const EXTERNAL: u32 = vk::SUBPASS_EXTERNAL;

    pub fn new(
        src_subpass: u32,
        dst_subpass: u32,
        src_stage_mask: vk::PipelineStageFlags,
        dst_stage_mask: vk::PipelineStageFlags,
        src_access_mask: vk::AccessFlags,
        dst_access_mask: vk::AccessFlags,
        dependency_flags: vk::DependencyFlags,
    ) -> Self {
        Self {
            dependency: vk::SubpassDependency2::default()
                .src_subpass(src_subpass)
                .dst_subpass(dst_subpass)
                .src_stage_mask(src_stage_mask)
                .dst_stage_mask(dst_stage_mask)
                .src_access_mask(src_access_mask)
                .dst_access_mask(dst_access_mask)
                .dependency_flags(dependency_flags),
        }
    }

    /// Copy a `vk::SubpassDependency2` verbatim
    ///
    /// The `p_next` chain is copied as a raw pointer, it's neither followed
    /// nor owned.
    pub fn from_vk2(dependency: &vk::SubpassDependency2<'_>) -> Self {
        let mut out = vk::SubpassDependency2::default()
            .src_subpass(dependency.src_subpass)
            .dst_subpass(dependency.dst_subpass)
            .src_stage_mask(dependency.src_stage_mask)
            .dst_stage_mask(dependency.dst_stage_mask)
            .src_access_mask(dependency.src_access_mask)
            .dst_access_mask(dependency.dst_access_mask)
            .dependency_flags(dependency.dependency_flags)
            .view_offset(dependency.view_offset);
        out.s_type = dependency.s_type;
        out.p_next = dependency.p_next;
        Self { dependency: out }
    }

    /// Promote a "version 1" `vk::SubpassDependency`, with a zero view offset
    pub fn from_vk(dependency: &vk::SubpassDependency) -> Self {
        Self::new(
            dependency.src_subpass,
            dependency.dst_subpass,
            dependency.src_stage_mask,
            dependency.dst_stage_mask,
            dependency.src_access_mask,
            dependency.dst_access_mask,
            dependency.dependency_flags,
        )
    }

    /// The "version 1" structure
    pub fn vk_subpass_dependency(&self) -> vk::SubpassDependency {
        to_vk_subpass_dependency(&self.dependency)
    }

    /// The underlying `vk::SubpassDependency2`
    pub fn as_vk2(&self) -> &vk::SubpassDependency2<'static> {
        &self.dependency
    }
}

pub(crate) fn to_vk_subpass_dependency(dependency: &vk::SubpassDependency2<'_>) -> vk::SubpassDependency {
    vk::SubpassDependency::default()
        .src_subpass(dependency.src_subpass)
        .dst_subpass(dependency.dst_subpass)
        .src_stage_mask(dependency.src_stage_mask)
        .dst_stage_mask(dependency.dst_stage_mask)
        .src_access_mask(dependency.src_access_mask)
        .dst_access_mask(dependency.dst_access_mask)
        .dependency_flags(dependency.dependency_flags)
}

#[cfg(test)]
#[path = "subpass_tests.rs"]
mod tests;
