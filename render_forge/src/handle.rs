//! Handle ownership flags shared by every Vulkan handle wrapper

use bitflags::bitflags;

bitflags! {
    /// Controls what a wrapper does with its handle when dropped
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HandleFlags: u32 {
        /// Destroy the handle when the wrapper is dropped. Set for handles the
        /// wrapper created itself, not set by default for wrapped handles.
        const DESTROY_ON_DESTRUCTION = 0x00000001;
    }
}
