use core::alloc::Layout;
use core::ptr::NonNull;
use std::alloc;

use super::AllocError;
use super::AltAllocator;

/// A wrapper around the std global allocator.
///
/// Null results from `std::alloc` are reported as `AllocError` instead of
/// aborting through `handle_alloc_error`.
#[derive(Debug, Default, Copy, Clone)]
pub struct Global;

unsafe impl AltAllocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        // std::alloc::alloc() requires a non-zero size.
        if layout.size() == 0 {
            return Err(AllocError);
        }
        let ptr = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            log::warn!("global allocator refused {} bytes", layout.size());
            return Err(AllocError);
        };
        return Ok(NonNull::slice_from_raw_parts(ptr, layout.size()));
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
    }

    unsafe fn grow(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        return unsafe { realloc(old_ptr, old_layout, new_layout) };
    }

    unsafe fn shrink(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        return unsafe { realloc(old_ptr, old_layout, new_layout) };
    }
}

unsafe fn realloc(old_ptr: NonNull<u8>, old_layout: Layout, new_layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
    if new_layout.size() == 0 || new_layout.align() != old_layout.align() {
        return Err(AllocError);
    }
    let new = unsafe { alloc::realloc(old_ptr.as_ptr(), old_layout, new_layout.size()) };
    let Some(new) = NonNull::new(new) else {
        log::warn!(
            "global allocator refused to resize {} bytes to {}",
            old_layout.size(),
            new_layout.size()
        );
        return Err(AllocError);
    };
    return Ok(NonNull::slice_from_raw_parts(new, new_layout.size()));
}
