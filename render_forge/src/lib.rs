/*!
# render_forge

Vulkan render pass descriptions that stay valid while they are built.

Descriptions are stored in the "version 2" layout of the Vulkan API
(`VkRenderPassCreateInfo2` and friends) and can be turned into either
layout: a view borrowing the description for `vkCreateRenderPass2`, or a
single contiguous block for `vkCreateRenderPass`.

## Architecture

- **AttachmentDescription / AttachmentReference / SubpassDependency**: value
  wrappers around the "version 2" structures
- **SubpassDescription**: attachment lists of one subpass, owned
- **RenderPassCreateInfo**: attachments, subpasses and dependencies, with
  flattening into either layout
- **RenderPass / Shader**: handle wrappers destroying what they own
- **Device**: dispatch table plus the render pass creation strategy

The dispatch table is a trait, implemented on top of `ash` by the
`render_forge_vulkan` crate.
*/

// Internal modules
mod error;
mod runtime;
mod handle;
mod device;
mod render_pass;
mod shader;
pub mod log;

// Main forge namespace module
pub mod forge {
    // Error types
    pub use crate::error::{Error, Result};

    // Logger registry and precondition handling
    pub use crate::runtime::Forge;

    // Handle ownership
    pub use crate::handle::HandleFlags;

    // Device collaborator
    pub use crate::device::{Device, DeviceDispatch, RenderPassCreateImplementation};

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render pass sub-module
    pub mod render_pass {
        pub use crate::render_pass::*;
    }

    // Shader sub-module
    pub mod shader {
        pub use crate::shader::*;
    }
}

// Re-export the Vulkan bindings the public API is expressed in
pub use ash;
