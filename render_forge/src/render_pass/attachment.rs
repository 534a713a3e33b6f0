/// Attachment descriptions and references
///
/// Both wrappers store the "version 2" Vulkan structure, so a slice of
/// wrappers is directly usable as the array a `vk::SubpassDescription2` or a
/// `vk::RenderPassCreateInfo2` points to. The "version 1" structures are
/// produced on demand by dropping the fields they don't have.

use ash::vk;
use bitflags::bitflags;

/// Image layout an attachment is in or is transitioned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageLayout {
    /// Undefined layout, contents may be discarded
    Undefined,
    /// Supports all access, usually not optimal
    General,
    /// Color attachment output
    ColorAttachment,
    /// Depth/stencil attachment output
    DepthStencilAttachment,
    /// Read-only depth/stencil attachment or sampled depth
    DepthStencilReadOnly,
    /// Read-only access from shaders (sampled images, input attachments)
    ShaderReadOnly,
    /// Source of a transfer operation
    TransferSrc,
    /// Destination of a transfer operation
    TransferDst,
    /// Preinitialized linear image contents
    Preinitialized,
    /// Presenting to a swapchain
    PresentSrc,
}

impl From<ImageLayout> for vk::ImageLayout {
    fn from(layout: ImageLayout) -> Self {
        match layout {
            ImageLayout::Undefined => vk::ImageLayout::UNDEFINED,
            ImageLayout::General => vk::ImageLayout::GENERAL,
            ImageLayout::ColorAttachment => vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            ImageLayout::DepthStencilAttachment => vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
            ImageLayout::DepthStencilReadOnly => vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL,
            ImageLayout::ShaderReadOnly => vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            ImageLayout::TransferSrc => vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
            ImageLayout::TransferDst => vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            ImageLayout::Preinitialized => vk::ImageLayout::PREINITIALIZED,
            ImageLayout::PresentSrc => vk::ImageLayout::PRESENT_SRC_KHR,
        }
    }
}

impl TryFrom<vk::ImageLayout> for ImageLayout {
    type Error = vk::ImageLayout;

    fn try_from(layout: vk::ImageLayout) -> Result<Self, Self::Error> {
        Ok(match layout {
            vk::ImageLayout::UNDEFINED => ImageLayout::Undefined,
            vk::ImageLayout::GENERAL => ImageLayout::General,
            vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL => ImageLayout::ColorAttachment,
            vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL => ImageLayout::DepthStencilAttachment,
            vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL => ImageLayout::DepthStencilReadOnly,
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL => ImageLayout::ShaderReadOnly,
            vk::ImageLayout::TRANSFER_SRC_OPTIMAL => ImageLayout::TransferSrc,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL => ImageLayout::TransferDst,
            vk::ImageLayout::PREINITIALIZED => ImageLayout::Preinitialized,
            vk::ImageLayout::PRESENT_SRC_KHR => ImageLayout::PresentSrc,
            other => return Err(other),
        })
    }
}

/// Load operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadOp {
    /// Load existing content
    Load,
    /// Clear the content
    Clear,
    /// Don't care about existing content
    DontCare,
}

impl From<LoadOp> for vk::AttachmentLoadOp {
    fn from(load_op: LoadOp) -> Self {
        match load_op {
            LoadOp::Load => vk::AttachmentLoadOp::LOAD,
            LoadOp::Clear => vk::AttachmentLoadOp::CLEAR,
            LoadOp::DontCare => vk::AttachmentLoadOp::DONT_CARE,
        }
    }
}

/// Store operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// Store the rendered content
    Store,
    /// Don't care about storing the content
    DontCare,
}

impl From<StoreOp> for vk::AttachmentStoreOp {
    fn from(store_op: StoreOp) -> Self {
        match store_op {
            StoreOp::Store => vk::AttachmentStoreOp::STORE,
            StoreOp::DontCare => vk::AttachmentStoreOp::DONT_CARE,
        }
    }
}

bitflags! {
    /// Attachment description flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttachmentDescriptionFlags: u32 {
        /// The attachment aliases memory of another attachment
        const MAY_ALIAS = 0x00000001;
    }
}

impl From<AttachmentDescriptionFlags> for vk::AttachmentDescriptionFlags {
    fn from(flags: AttachmentDescriptionFlags) -> Self {
        let mut result = vk::AttachmentDescriptionFlags::empty();

        if flags.contains(AttachmentDescriptionFlags::MAY_ALIAS) {
            result |= vk::AttachmentDescriptionFlags::MAY_ALIAS;
        }

        result
    }
}

// ============================================================================
// AttachmentDescription
// ============================================================================

/// Description of one attachment of a render pass
///
/// Wraps a `vk::AttachmentDescription2`.
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct AttachmentDescription {
    description: vk::AttachmentDescription2<'static>,
}

impl AttachmentDescription {
    /// Color attachment description
    ///
    /// `samples` is the sample count (1 for no multisampling). Stencil
    /// operations are left at `LOAD` / `STORE`, which is what Vulkan ignores
    /// for formats without a stencil aspect.
    pub fn new(
        format: vk::Format,
        load_op: LoadOp,
        store_op: StoreOp,
        initial_layout: ImageLayout,
        final_layout: ImageLayout,
        samples: u32,
    ) -> Self {
        Self {
            description: vk::AttachmentDescription2::default()
                .format(format)
                .samples(vk::SampleCountFlags::from_raw(samples))
                .load_op(load_op.into())
                .store_op(store_op.into())
                .initial_layout(initial_layout.into())
                .final_layout(final_layout.into()),
        }
    }

    /// Color attachment description with both layouts set to `General`
    pub fn general(format: vk::Format, load_op: LoadOp, store_op: StoreOp, samples: u32) -> Self {
        Self::new(format, load_op, store_op, ImageLayout::General, ImageLayout::General, samples)
    }

    /// Depth/stencil attachment description
    ///
    /// The operation pairs are `(depth, stencil)`.
    pub fn depth_stencil(
        format: vk::Format,
        load_ops: (LoadOp, LoadOp),
        store_ops: (StoreOp, StoreOp),
        initial_layout: ImageLayout,
        final_layout: ImageLayout,
        samples: u32,
    ) -> Self {
        Self {
            description: vk::AttachmentDescription2::default()
                .format(format)
                .samples(vk::SampleCountFlags::from_raw(samples))
                .load_op(load_ops.0.into())
                .store_op(store_ops.0.into())
                .stencil_load_op(load_ops.1.into())
                .stencil_store_op(store_ops.1.into())
                .initial_layout(initial_layout.into())
                .final_layout(final_layout.into()),
        }
    }

    /// Depth/stencil attachment description with both layouts set to `General`
    pub fn general_depth_stencil(
        format: vk::Format,
        load_ops: (LoadOp, LoadOp),
        store_ops: (StoreOp, StoreOp),
        samples: u32,
    ) -> Self {
        Self::depth_stencil(format, load_ops, store_ops, ImageLayout::General, ImageLayout::General, samples)
    }

    /// Replace the description flags
    pub fn with_flags(mut self, flags: AttachmentDescriptionFlags) -> Self {
        self.description.flags = flags.into();
        self
    }

    /// Copy a `vk::AttachmentDescription2` verbatim
    ///
    /// The `p_next` chain is copied as a raw pointer, it's neither followed
    /// nor owned.
    pub fn from_vk2(description: &vk::AttachmentDescription2<'_>) -> Self {
        let mut out = vk::AttachmentDescription2::default();
        out.s_type = description.s_type;
        out.p_next = description.p_next;
        out.flags = description.flags;
        out.format = description.format;
        out.samples = description.samples;
        out.load_op = description.load_op;
        out.store_op = description.store_op;
        out.stencil_load_op = description.stencil_load_op;
        out.stencil_store_op = description.stencil_store_op;
        out.initial_layout = description.initial_layout;
        out.final_layout = description.final_layout;
        Self { description: out }
    }

    /// Promote a "version 1" `vk::AttachmentDescription`
    pub fn from_vk(description: &vk::AttachmentDescription) -> Self {
        Self {
            description: vk::AttachmentDescription2::default()
                .flags(description.flags)
                .format(description.format)
                .samples(description.samples)
                .load_op(description.load_op)
                .store_op(description.store_op)
                .stencil_load_op(description.stencil_load_op)
                .stencil_store_op(description.stencil_store_op)
                .initial_layout(description.initial_layout)
                .final_layout(description.final_layout),
        }
    }

    /// The "version 1" structure
    pub fn vk_attachment_description(&self) -> vk::AttachmentDescription {
        to_vk_attachment_description(&self.description)
    }

    /// The underlying `vk::AttachmentDescription2`
    pub fn as_vk2(&self) -> &vk::AttachmentDescription2<'static> {
        &self.description
    }
}

/// Drop the fields "version 1" doesn't have
pub(crate) fn to_vk_attachment_description(
    description: &vk::AttachmentDescription2<'_>,
) -> vk::AttachmentDescription {
    vk::AttachmentDescription::default()
        .flags(description.flags)
        .format(description.format)
        .samples(description.samples)
        .load_op(description.load_op)
        .store_op(description.store_op)
        .stencil_load_op(description.stencil_load_op)
        .stencil_store_op(description.stencil_store_op)
        .initial_layout(description.initial_layout)
        .final_layout(description.final_layout)
}

// ============================================================================
// AttachmentReference
// ============================================================================

/// Reference to an attachment from a subpass
///
/// Wraps a `vk::AttachmentReference2`. The default value is the "unused"
/// reference, used for optional attachment slots.
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct AttachmentReference {
    reference: vk::AttachmentReference2<'static>,
}

impl AttachmentReference {
    /// Reference to `attachment` in given layout
    pub fn new(attachment: u32, layout: ImageLayout) -> Self {
        Self {
            reference: vk::AttachmentReference2::default()
                .attachment(attachment)
                .layout(layout.into()),
        }
    }

    /// Unused reference: `vk::ATTACHMENT_UNUSED` in `UNDEFINED` layout
    pub fn unused() -> Self {
        Self {
            reference: vk::AttachmentReference2::default()
                .attachment(vk::ATTACHMENT_UNUSED)
                .layout(vk::ImageLayout::UNDEFINED),
        }
    }

    /// Copy a `vk::AttachmentReference2` verbatim
    ///
    /// The `p_next` chain is copied as a raw pointer, it's neither followed
    /// nor owned.
    pub fn from_vk2(reference: &vk::AttachmentReference2<'_>) -> Self {
        let mut out = vk::AttachmentReference2::default();
        out.s_type = reference.s_type;
        out.p_next = reference.p_next;
        out.attachment = reference.attachment;
        out.layout = reference.layout;
        out.aspect_mask = reference.aspect_mask;
        Self { reference: out }
    }

    /// Promote a "version 1" `vk::AttachmentReference`, with an empty aspect mask
    pub fn from_vk(reference: &vk::AttachmentReference) -> Self {
        Self {
            reference: vk::AttachmentReference2::default()
                .attachment(reference.attachment)
                .layout(reference.layout),
        }
    }

    /// The "version 1" structure
    pub fn vk_attachment_reference(&self) -> vk::AttachmentReference {
        to_vk_attachment_reference(&self.reference)
    }

    /// Referenced attachment index, `vk::ATTACHMENT_UNUSED` if unused
    pub fn attachment(&self) -> u32 {
        self.reference.attachment
    }

    /// Layout the attachment is used in
    pub fn layout(&self) -> vk::ImageLayout {
        self.reference.layout
    }

    /// Whether this is the "unused" reference
    pub fn is_unused(&self) -> bool {
        self.reference.attachment == vk::ATTACHMENT_UNUSED
    }

    /// The underlying `vk::AttachmentReference2`
    pub fn as_vk2(&self) -> &vk::AttachmentReference2<'static> {
        &self.reference
    }
}

impl Default for AttachmentReference {
    fn default() -> Self {
        Self::unused()
    }
}

/// Drop the fields "version 1" doesn't have
pub(crate) fn to_vk_attachment_reference(
    reference: &vk::AttachmentReference2<'_>,
) -> vk::AttachmentReference {
    vk::AttachmentReference::default()
        .attachment(reference.attachment)
        .layout(reference.layout)
}

#[cfg(test)]
#[path = "attachment_tests.rs"]
mod tests;
