//! Contiguous storage for flattened "version 1" structures
//!
//! Flattening writes a header structure followed by the arrays it points to
//! into one allocation. The block is allocated as 64-bit words so every
//! structure placed at a suitably aligned offset is aligned too, and it is
//! handed out as a raw pointer so the internal pointers written into it all
//! share the same provenance. `Drop` gives the words back to the allocator
//! they came from.

use std::mem;
use std::ptr::{self, NonNull};

const _: () = assert!(mem::align_of::<u64>() >= mem::align_of::<*const ()>());

pub(crate) struct LegacyBlock {
    data: NonNull<u64>,
    words: usize,
    size: usize,
}

impl LegacyBlock {
    /// Allocate `size` zeroed bytes
    pub(crate) fn zeroed(size: usize) -> Self {
        let words = size.div_ceil(mem::size_of::<u64>()).max(1);
        let storage: Box<[u64]> = vec![0u64; words].into_boxed_slice();
        let data = NonNull::from(Box::leak(storage)).cast::<u64>();
        Self { data, words, size }
    }

    /// Start of the block, aligned to at least pointer alignment
    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.data.as_ptr().cast::<u8>()
    }

    /// Size in bytes as requested on allocation
    pub(crate) fn len(&self) -> usize {
        self.size
    }

    /// Write `value` at `offset`
    ///
    /// # Safety
    ///
    /// `offset` has to be aligned for `T` and `offset + size_of::<T>()` has to
    /// fit into the block.
    pub(crate) unsafe fn write<T>(&self, offset: usize, value: T) -> *mut T {
        debug_assert!(offset + mem::size_of::<T>() <= self.size);
        debug_assert_eq!(offset % mem::align_of::<T>(), 0);
        let target = self.as_ptr().add(offset).cast::<T>();
        target.write(value);
        target
    }
}

impl Drop for LegacyBlock {
    fn drop(&mut self) {
        // data and words come from the boxed slice leaked in zeroed()
        unsafe {
            drop(Box::from_raw(ptr::slice_from_raw_parts_mut(self.data.as_ptr(), self.words)));
        }
    }
}
