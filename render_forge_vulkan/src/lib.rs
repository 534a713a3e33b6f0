/*!
# render_forge_vulkan

Vulkan backend for render_forge.

Provides the `ash` implementation of `DeviceDispatch` and a headless
`VulkanContext` that creates the instance and logical device and picks the
render pass creation strategy from the device version and the enabled
extensions.

With the `vulkan-validation` feature the Khronos validation layer can be
enabled; its messages go through the render_forge logger.

```no_run
use render_forge::forge::render_pass::*;
use render_forge_vulkan::{ContextConfig, VulkanContext};

# fn main() -> render_forge::forge::Result<()> {
let context = VulkanContext::new(ContextConfig::default())?;

let mut subpass = SubpassDescription::new();
subpass.set_color_attachments(&[AttachmentReference::new(0, ImageLayout::ColorAttachment)], &[]);

let mut info = RenderPassCreateInfo::new();
info.set_attachments(&[AttachmentDescription::general(
    render_forge::ash::vk::Format::R8G8B8A8_UNORM,
    LoadOp::Clear,
    StoreOp::Store,
    1,
)]);
info.add_subpass(subpass);

let render_pass = RenderPass::new(context.device(), &info)?;
# drop(render_pass);
# Ok(())
# }
```
*/

mod vulkan_context;
mod vulkan_device;
#[cfg(feature = "vulkan-validation")]
mod debug;

pub use vulkan_context::{render_pass_extensions, ContextConfig, ValidationSeverity, VulkanContext};
pub use vulkan_device::VulkanDeviceDispatch;

// Re-export debug utilities
#[cfg(feature = "vulkan-validation")]
pub use debug::{get_validation_stats, print_validation_stats_report, ValidationStats};
