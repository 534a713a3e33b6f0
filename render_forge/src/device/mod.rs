//! Device collaborator: Vulkan entry points and per-device creation strategies

#[allow(clippy::module_inception)]
mod device;
#[cfg(test)]
pub(crate) mod mock_device;

pub use device::{Device, DeviceDispatch, RenderPassCreateImplementation};
