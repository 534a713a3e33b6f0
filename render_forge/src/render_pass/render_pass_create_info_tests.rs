//! Unit tests for render_pass_create_info.rs
//!
//! Covers the "version 2" view and the contiguous "version 1" flattening.

use crate::render_pass::*;
use ash::vk;
use std::mem::size_of;

fn color_attachment() -> AttachmentDescription {
    AttachmentDescription::new(
        vk::Format::R8G8B8A8_SRGB,
        LoadOp::Clear,
        StoreOp::Store,
        ImageLayout::Undefined,
        ImageLayout::General,
        1,
    )
}

fn color_subpass(index: u32) -> SubpassDescription {
    let mut subpass = SubpassDescription::new();
    subpass.set_color_attachments(&[AttachmentReference::new(index, ImageLayout::ColorAttachment)], &[]);
    subpass
}

fn offset_of<T>(base: *const u8, pointer: *const T) -> Option<usize> {
    if pointer.is_null() {
        None
    } else {
        Some(pointer as usize - base as usize)
    }
}

/// Offsets of every pointer stored in a flattened info relative to its block
fn relative_offsets(legacy: &LegacyRenderPassCreateInfo<'_>) -> Vec<Option<usize>> {
    let base = legacy.as_ptr();
    let raw = legacy.as_raw();
    let mut offsets = vec![
        offset_of(base, raw.p_attachments),
        offset_of(base, raw.p_subpasses),
        offset_of(base, raw.p_dependencies),
    ];
    for subpass in legacy.subpasses() {
        offsets.push(offset_of(base, subpass.p_input_attachments));
        offsets.push(offset_of(base, subpass.p_color_attachments));
        offsets.push(offset_of(base, subpass.p_resolve_attachments));
        offsets.push(offset_of(base, subpass.p_depth_stencil_attachment));
    }
    offsets
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

#[test]
fn test_new_is_empty() {
    let info = RenderPassCreateInfo::new();

    assert!(info.flags().is_empty());
    assert!(info.attachments().is_empty());
    assert_eq!(info.subpass_count(), 0);
    assert!(info.dependencies().is_empty());
    assert!(info.correlated_view_masks().is_empty());
}

#[test]
fn test_take_leaves_empty_info() {
    let mut info = RenderPassCreateInfo::new();
    info.set_attachments(&[color_attachment()]).add_subpass(color_subpass(0));

    let moved = std::mem::take(&mut info);
    assert_eq!(moved.subpass_count(), 1);
    assert_eq!(moved.attachments().len(), 1);

    let view = info.vk_render_pass_create_info2();
    let raw = view.as_raw();
    assert_eq!(raw.attachment_count, 0);
    assert!(raw.p_attachments.is_null());
    assert_eq!(raw.subpass_count, 0);
    assert!(raw.p_subpasses.is_null());
    assert_eq!(raw.dependency_count, 0);
    assert!(raw.p_dependencies.is_null());
    assert!(raw.p_next.is_null());
}

// ============================================================================
// VERSION 2 VIEW
// ============================================================================

#[test]
fn test_vk_render_pass_create_info2() {
    let mut info = RenderPassCreateInfo::with_flags(vk::RenderPassCreateFlags::TRANSFORM_QCOM);
    info.set_attachments(&[color_attachment(), color_attachment()])
        .add_subpass(color_subpass(0))
        .add_subpass(color_subpass(1))
        .set_dependencies(&[SubpassDependency::new(
            0,
            1,
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            vk::PipelineStageFlags::FRAGMENT_SHADER,
            vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
            vk::AccessFlags::SHADER_READ,
            vk::DependencyFlags::BY_REGION,
        )])
        .set_correlated_view_masks(vec![0b01, 0b10]);

    let view = info.vk_render_pass_create_info2();
    let raw = view.as_raw();

    assert_eq!(raw.s_type, vk::StructureType::RENDER_PASS_CREATE_INFO_2);
    assert_eq!(raw.flags, vk::RenderPassCreateFlags::TRANSFORM_QCOM);
    assert_eq!(raw.attachment_count, 2);
    assert_eq!(raw.p_attachments, info.attachments()[0].as_vk2() as *const _);
    assert_eq!(raw.subpass_count, 2);
    assert_eq!(raw.p_subpasses, view.subpasses().as_ptr());
    assert_eq!(raw.dependency_count, 1);
    assert_eq!(raw.correlated_view_mask_count, 2);

    unsafe {
        assert_eq!((*(*raw.p_subpasses.add(1)).p_color_attachments).attachment, 1);
        assert_eq!((*raw.p_dependencies).dst_access_mask, vk::AccessFlags::SHADER_READ);
        assert_eq!(*raw.p_correlated_view_masks.add(1), 0b10);
    }
}

#[test]
fn test_view_follows_appends() {
    let mut info = RenderPassCreateInfo::new();
    for i in 0..17 {
        info.add_subpass(color_subpass(i));
    }

    let view = info.vk_render_pass_create_info2();
    assert_eq!(view.as_raw().subpass_count, 17);
    for (i, subpass) in view.subpasses().iter().enumerate() {
        assert_eq!(subpass.color_attachment_count, 1);
        assert_eq!(
            subpass.p_color_attachments,
            info.subpasses()[i].color_attachments().as_ptr().cast::<vk::AttachmentReference2<'_>>()
        );
        unsafe {
            assert_eq!((*subpass.p_color_attachments).attachment, i as u32);
        }
    }
}

// ============================================================================
// VERSION 1 FLATTENING
// ============================================================================

#[test]
fn test_flatten_single_color_subpass() {
    let mut info = RenderPassCreateInfo::new();
    info.set_attachments(&[color_attachment()]).add_subpass(color_subpass(0));

    let legacy = info.vk_render_pass_create_info();
    let raw = legacy.as_raw();

    assert_eq!(raw.s_type, vk::StructureType::RENDER_PASS_CREATE_INFO);
    assert_eq!(raw.attachment_count, 1);
    assert_eq!(raw.subpass_count, 1);
    assert_eq!(raw.dependency_count, 0);
    assert!(raw.p_dependencies.is_null());

    let attachment = &legacy.attachments()[0];
    assert_eq!(attachment.format, vk::Format::R8G8B8A8_SRGB);
    assert_eq!(attachment.load_op, vk::AttachmentLoadOp::CLEAR);
    assert_eq!(attachment.store_op, vk::AttachmentStoreOp::STORE);
    assert_eq!(attachment.initial_layout, vk::ImageLayout::UNDEFINED);
    assert_eq!(attachment.final_layout, vk::ImageLayout::GENERAL);

    let subpass = &legacy.subpasses()[0];
    assert_eq!(subpass.color_attachment_count, 1);
    let reference = unsafe { &*subpass.p_color_attachments };
    assert_eq!(reference.attachment, 0);
    assert_eq!(reference.layout, vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);

    assert_eq!(
        legacy.size(),
        size_of::<vk::RenderPassCreateInfo>()
            + size_of::<vk::SubpassDescription>()
            + size_of::<vk::AttachmentDescription>()
            + size_of::<vk::AttachmentReference>()
    );
}

#[test]
fn test_flatten_layout_order() {
    let mut info = RenderPassCreateInfo::new();
    info.set_attachments(&[color_attachment()])
        .add_subpass(color_subpass(0))
        .add_subpass(color_subpass(0))
        .set_dependencies(&[SubpassDependency::from_vk(&vk::SubpassDependency::default())]);

    let legacy = info.vk_render_pass_create_info();
    let base = legacy.as_ptr();
    let raw = legacy.as_raw();

    let subpasses_at = size_of::<vk::RenderPassCreateInfo>();
    let attachments_at = subpasses_at + 2 * size_of::<vk::SubpassDescription>();
    let dependencies_at = attachments_at + size_of::<vk::AttachmentDescription>();
    let extras_at = dependencies_at + size_of::<vk::SubpassDependency>();

    assert_eq!(offset_of(base, raw.p_subpasses), Some(subpasses_at));
    assert_eq!(offset_of(base, raw.p_attachments), Some(attachments_at));
    assert_eq!(offset_of(base, raw.p_dependencies), Some(dependencies_at));
    assert_eq!(offset_of(base, legacy.subpasses()[0].p_color_attachments), Some(extras_at));
    assert_eq!(
        offset_of(base, legacy.subpasses()[1].p_color_attachments),
        Some(extras_at + size_of::<vk::AttachmentReference>())
    );
    assert_eq!(legacy.size(), extras_at + 2 * size_of::<vk::AttachmentReference>());
}

#[test]
fn test_flatten_trailer_sizes() {
    let record = size_of::<vk::AttachmentReference>();
    let headers = size_of::<vk::RenderPassCreateInfo>();

    let mut plain = SubpassDescription::new();
    plain
        .set_input_attachments(&[AttachmentReference::new(0, ImageLayout::ShaderReadOnly)])
        .set_color_attachments(
            &[
                AttachmentReference::new(1, ImageLayout::ColorAttachment),
                AttachmentReference::new(2, ImageLayout::ColorAttachment),
            ],
            &[],
        );

    let mut resolving = SubpassDescription::new();
    resolving
        .set_color_attachments(
            &[
                AttachmentReference::new(1, ImageLayout::ColorAttachment),
                AttachmentReference::new(2, ImageLayout::ColorAttachment),
            ],
            &[
                AttachmentReference::new(3, ImageLayout::ColorAttachment),
                AttachmentReference::new(4, ImageLayout::ColorAttachment),
            ],
        )
        .set_depth_stencil_attachment(AttachmentReference::new(5, ImageLayout::DepthStencilAttachment));

    assert_eq!(plain.legacy_extras_size(), 3 * record);
    assert_eq!(resolving.legacy_extras_size(), 5 * record);

    let mut info = RenderPassCreateInfo::new();
    info.add_subpass(plain).add_subpass(resolving);

    let legacy = info.vk_render_pass_create_info();
    assert_eq!(legacy.subpasses().len(), 2);
    assert_eq!(
        legacy.size(),
        headers + 2 * size_of::<vk::SubpassDescription>() + 8 * record
    );

    let second = &legacy.subpasses()[1];
    assert!(second.p_input_attachments.is_null());
    unsafe {
        assert_eq!((*second.p_resolve_attachments.add(1)).attachment, 4);
        assert_eq!((*second.p_depth_stencil_attachment).attachment, 5);
    }
}

#[test]
fn test_flatten_twice_is_identical() {
    let mut info = RenderPassCreateInfo::new();
    let mut subpass = SubpassDescription::new();
    subpass
        .set_input_attachments(&[AttachmentReference::new(1, ImageLayout::ShaderReadOnly)])
        .set_color_attachments(
            &[AttachmentReference::new(0, ImageLayout::ColorAttachment)],
            &[AttachmentReference::new(2, ImageLayout::ColorAttachment)],
        )
        .set_preserve_attachments(vec![3]);
    info.set_attachments(&[color_attachment(), color_attachment(), color_attachment()])
        .add_subpass(subpass)
        .add_subpass(color_subpass(1));

    let first = info.vk_render_pass_create_info();
    let second = info.vk_render_pass_create_info();

    assert_eq!(first.size(), second.size());
    assert_ne!(first.as_ptr(), second.as_ptr());
    assert_eq!(relative_offsets(&first), relative_offsets(&second));
    assert_eq!(
        first.subpasses()[0].p_preserve_attachments,
        second.subpasses()[0].p_preserve_attachments
    );

    let trailer_at = size_of::<vk::RenderPassCreateInfo>()
        + 2 * size_of::<vk::SubpassDescription>()
        + 3 * size_of::<vk::AttachmentDescription>();
    let trailer = |legacy: &LegacyRenderPassCreateInfo<'_>| unsafe {
        std::slice::from_raw_parts(legacy.as_ptr().add(trailer_at), legacy.size() - trailer_at).to_vec()
    };
    assert_eq!(trailer(&first), trailer(&second));
}

#[test]
fn test_flatten_after_many_appends() {
    let mut info = RenderPassCreateInfo::new();
    for i in 0..33 {
        info.add_subpass(color_subpass(i));
        let legacy = info.vk_render_pass_create_info();
        assert_eq!(legacy.subpasses().len(), i as usize + 1);
        let last = legacy.subpasses().last().map(|s| unsafe { (*s.p_color_attachments).attachment });
        assert_eq!(last, Some(i));
    }
}

#[test]
fn test_flatten_drops_version_2_only_data() {
    let mut info = RenderPassCreateInfo::new();
    info.add_subpass(color_subpass(0)).set_correlated_view_masks(vec![1]);

    let legacy = info.vk_render_pass_create_info();
    assert_eq!(legacy.subpasses()[0].color_attachment_count, 1);
    assert_eq!(
        legacy.size(),
        size_of::<vk::RenderPassCreateInfo>()
            + size_of::<vk::SubpassDescription>()
            + size_of::<vk::AttachmentReference>()
    );
}

#[test]
fn test_flatten_empty_info() {
    let info = RenderPassCreateInfo::new();
    let legacy = info.vk_render_pass_create_info();
    let raw = legacy.as_raw();

    assert_eq!(legacy.size(), size_of::<vk::RenderPassCreateInfo>());
    assert!(raw.p_attachments.is_null());
    assert!(raw.p_subpasses.is_null());
    assert!(raw.p_dependencies.is_null());
    assert!(legacy.subpasses().is_empty());
}

// ============================================================================
// CONVERSIONS
// ============================================================================

#[test]
fn test_from_vk2_deep_copies() {
    let attachments = [*color_attachment().as_vk2()];
    let colors = [vk::AttachmentReference2::default()
        .attachment(0)
        .layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)];
    let subpasses = [vk::SubpassDescription2::default()
        .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
        .view_mask(0b11)
        .color_attachments(&colors)];
    let masks = [0b11u32];
    let raw = vk::RenderPassCreateInfo2::default()
        .attachments(&attachments)
        .subpasses(&subpasses)
        .correlated_view_masks(&masks);

    let info = unsafe { RenderPassCreateInfo::from_vk2(&raw) };

    assert_eq!(info.attachments().len(), 1);
    assert_eq!(info.subpass_count(), 1);
    assert_eq!(info.correlated_view_masks(), &[0b11]);

    let view = info.vk_render_pass_create_info2();
    assert_eq!(view.subpasses()[0].view_mask, 0b11);
    assert_ne!(view.as_raw().p_attachments, attachments.as_ptr());
}

#[test]
fn test_from_vk_promotes_everything() {
    let attachments = [color_attachment().vk_attachment_description()];
    let colors = [vk::AttachmentReference { attachment: 0, layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL }];
    let subpasses = [vk::SubpassDescription::default()
        .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
        .color_attachments(&colors)];
    let dependencies = [vk::SubpassDependency::default()
        .src_subpass(vk::SUBPASS_EXTERNAL)
        .dst_subpass(0)];
    let raw = vk::RenderPassCreateInfo::default()
        .attachments(&attachments)
        .subpasses(&subpasses)
        .dependencies(&dependencies);

    let info = unsafe { RenderPassCreateInfo::from_vk(&raw) };
    let view = info.vk_render_pass_create_info2();
    let raw2 = view.as_raw();

    assert_eq!(raw2.s_type, vk::StructureType::RENDER_PASS_CREATE_INFO_2);
    assert_eq!(raw2.attachment_count, 1);
    assert_eq!(raw2.subpass_count, 1);
    assert_eq!(raw2.dependency_count, 1);
    assert_eq!(info.dependencies()[0].as_vk2().src_subpass, vk::SUBPASS_EXTERNAL);
    assert_eq!(
        info.attachments()[0].as_vk2().s_type,
        vk::StructureType::ATTACHMENT_DESCRIPTION_2
    );

    // And back down again
    let legacy = info.vk_render_pass_create_info();
    assert_eq!(legacy.attachments()[0].format, attachments[0].format);
    assert_eq!(legacy.dependencies()[0].src_subpass, vk::SUBPASS_EXTERNAL);
}
