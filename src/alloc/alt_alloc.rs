use core::alloc::Layout;
use core::ptr::NonNull;

use super::AllocError;

/// The allocation facility a `CappedVec` draws its storage from.
///
/// The shape follows the unstable `Allocator` API so any allocator can be
/// wrapped in a `no_std` build, and so tests can inject allocation failure.
/// The safety requirements match the allocator API:
/// <https://doc.rust-lang.org/std/alloc/trait.Allocator.html>
///
/// `CappedVec` never asks for a zero sized layout.
pub unsafe trait AltAllocator {
    /// Allocates a block of memory fitting `layout`.
    ///
    /// Returns `AllocError` if the request cannot be satisfied.
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

    /// Releases the block at `ptr`.
    ///
    /// `ptr` must have come from this allocator and `layout` must be the
    /// layout it was allocated with.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Moves the block at `old_ptr` into a larger block fitting `new_layout`.
    ///
    /// On failure `old_ptr` is still valid and its contents untouched. On
    /// success `old_ptr` must no longer be used.
    unsafe fn grow(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        let new = self.allocate(new_layout)?;
        let ptr = new.cast::<u8>();

        unsafe { ptr.copy_from_nonoverlapping(old_ptr, old_layout.size()) };
        unsafe { self.deallocate(old_ptr, old_layout) };
        return Ok(new);
    }

    /// Moves the first `new_layout.size()` bytes of the block at `old_ptr`
    /// into a smaller block.
    ///
    /// Same validity rules as `grow`.
    unsafe fn shrink(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        let new = self.allocate(new_layout)?;
        let ptr = new.cast::<u8>();

        unsafe { ptr.copy_from_nonoverlapping(old_ptr, new_layout.size()) };
        unsafe { self.deallocate(old_ptr, old_layout) };
        return Ok(new);
    }
}

// `allocator_api2` already forwards its trait through references.
#[cfg(not(feature = "alloc_api2"))]
unsafe impl<A> AltAllocator for &A
where
    A: AltAllocator,
{
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        return (**self).allocate(layout);
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { (**self).deallocate(ptr, layout) };
    }

    #[inline]
    unsafe fn grow(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        return unsafe { (**self).grow(old_ptr, old_layout, new_layout) };
    }

    #[inline]
    unsafe fn shrink(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        return unsafe { (**self).shrink(old_ptr, old_layout, new_layout) };
    }
}
