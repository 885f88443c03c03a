use core::alloc::Layout;
use core::marker::PhantomData;
use core::ptr;
use core::ptr::NonNull;

use crate::alloc::AltAllocator;
use crate::types::CappedVecErr;
use crate::types::CappedVecResult;
use crate::types::ErrorKind;
use crate::types::LengthType;

pub(crate) const fn layout_array(layout: Layout, length: usize) -> CappedVecResult<Layout> {
    let lay = layout.pad_to_align();
    let Some(len) = length.checked_mul(lay.size()) else {
        return Err(CappedVecErr::new(ErrorKind::UsizeOverflow));
    };
    let Ok(lay) = Layout::from_size_align(len, layout.align()) else {
        return Err(CappedVecErr::new(ErrorKind::LayoutFailure));
    };
    return Ok(lay);
}

/// Whether an `Inner` currently owns a block from its allocator.
///
/// Zero sized element types, and every empty buffer, use a dangling pointer
/// and stay `Empty` while still reporting a capacity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Storage {
    Empty,
    Allocated,
}

/// A block of memory allocated for `capacity` slots that is not owned by any
/// `Inner` yet.
pub(crate) struct Block {
    pub(crate) ptr:      NonNull<u8>,
    pub(crate) capacity: usize,
    pub(crate) storage:  Storage,
}

/// The raw buffer of a `CappedVec`. It tracks capacity and ownership of the
/// allocation, never which slots are initialized.
pub(crate) struct Inner<T, L: LengthType, A: AltAllocator> {
    ptr:      NonNull<u8>,
    capacity: L,
    storage:  Storage,
    alloc:    A,
    _ph:      PhantomData<T>,
}

impl<T, L: LengthType, A: AltAllocator> Inner<T, L, A> {
    const LAYOUT: Layout = Layout::new::<T>();

    pub(crate) const fn new_in(alloc: A) -> Self {
        return Self {
            ptr:      NonNull::<T>::dangling().cast(),
            capacity: L::ZERO_VALUE,
            storage:  Storage::Empty,
            alloc:    alloc,
            _ph:      PhantomData,
        };
    }

    pub(crate) fn with_capacity_in(alloc: A, capacity: usize) -> CappedVecResult<Self> {
        if L::from_usize(capacity).is_none() {
            return Err(CappedVecErr::new(ErrorKind::CapacityExceeded));
        }
        let mut inner = Self::new_in(alloc);
        let block = allocate_block::<T, A>(&inner.alloc, capacity)?;
        unsafe { inner.adopt(block) };
        return Ok(inner);
    }

    #[inline]
    pub(crate) const fn capacity(&self) -> L {
        return self.capacity;
    }

    #[cfg(test)]
    pub(crate) const fn storage(&self) -> Storage {
        return self.storage;
    }

    #[inline]
    pub(crate) const fn get_ptr(&self) -> *mut T {
        return self.ptr.as_ptr().cast();
    }

    #[inline]
    pub(crate) const fn allocator(&self) -> &A {
        return &self.alloc;
    }

    /// Moves the buffer to exactly `new_cap` slots. The first `live` slots keep
    /// their contents. On failure the current buffer is untouched.
    ///
    /// # Safety
    /// `live` must not exceed `new_cap` or the current capacity.
    pub(crate) unsafe fn reallocate(&mut self, new_cap: usize, live: usize) -> CappedVecResult<()> {
        let old_cap = self.capacity.as_usize();
        if new_cap == old_cap {
            return Ok(());
        }
        let Some(new_len) = L::from_usize(new_cap) else {
            return Err(CappedVecErr::new(ErrorKind::CapacityExceeded));
        };
        let old_layout = layout_array(Self::LAYOUT, old_cap)?;
        let new_layout = layout_array(Self::LAYOUT, new_cap)?;

        if old_layout.size() == 0 || new_layout.size() == 0 || self.storage == Storage::Empty {
            // One side has no allocation, so this is a plain allocate or release.
            let block = allocate_block::<T, A>(&self.alloc, new_cap)?;
            let dst = block.ptr.as_ptr().cast::<T>();
            unsafe { ptr::copy_nonoverlapping(self.get_ptr(), dst, live) };
            unsafe { self.adopt(block) };
            return Ok(());
        }

        if new_layout.size() > (isize::MAX as usize) {
            return Err(CappedVecErr::new(ErrorKind::UsizeOverflow));
        }

        let moved = if new_cap > old_cap {
            unsafe { self.alloc.grow(self.ptr, old_layout, new_layout) }
        } else {
            unsafe { self.alloc.shrink(self.ptr, old_layout, new_layout) }
        };
        let Ok(moved) = moved else {
            log::warn!("reallocation from {} to {} slots failed", old_cap, new_cap);
            return Err(CappedVecErr::new(ErrorKind::AllocFailure));
        };
        log::trace!("reallocated from {} to {} slots", old_cap, new_cap);
        self.ptr = moved.cast();
        self.capacity = new_len;
        return Ok(());
    }

    /// Takes ownership of `block`, releasing the current one.
    ///
    /// # Safety
    /// `block` must come from `allocate_block` with this inner's allocator,
    /// and every live element must already have been moved out of the
    /// current buffer.
    pub(crate) unsafe fn adopt(&mut self, block: Block) {
        self.release();
        // Callers keep every block within `max_size()`, which always fits `L`.
        debug_assert!(L::from_usize(block.capacity).is_some());
        self.capacity = L::from_usize(block.capacity).unwrap_or(L::ZERO_VALUE);
        self.ptr = block.ptr;
        self.storage = block.storage;
    }

    fn release(&mut self) {
        if self.storage == Storage::Allocated {
            if let Ok(layout) = layout_array(Self::LAYOUT, self.capacity.as_usize()) {
                unsafe { self.alloc.deallocate(self.ptr, layout) };
            }
        }
        self.ptr = NonNull::<T>::dangling().cast();
        self.capacity = L::ZERO_VALUE;
        self.storage = Storage::Empty;
    }
}

impl<T, L: LengthType, A: AltAllocator> Drop for Inner<T, L, A> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Allocates room for `capacity` values of `T` from `alloc` without touching
/// any existing buffer.
pub(crate) fn allocate_block<T, A: AltAllocator>(alloc: &A, capacity: usize) -> CappedVecResult<Block> {
    let layout = layout_array(Layout::new::<T>(), capacity)?;

    // Don't allocate anything in this case.
    if layout.size() == 0 {
        return Ok(Block {
            ptr:      NonNull::<T>::dangling().cast(),
            capacity: capacity,
            storage:  Storage::Empty,
        });
    }

    // Safety: rust is pretty adamant about sizes not being over isize::MAX
    if layout.size() > (isize::MAX as usize) {
        return Err(CappedVecErr::new(ErrorKind::UsizeOverflow));
    }

    let Ok(ptr) = alloc.allocate(layout) else {
        log::warn!("allocation of {} slots ({} bytes) failed", capacity, layout.size());
        return Err(CappedVecErr::new(ErrorKind::AllocFailure));
    };
    log::trace!("allocated {} slots ({} bytes)", capacity, layout.size());

    return Ok(Block {
        ptr:      ptr.cast(),
        capacity: capacity,
        storage:  Storage::Allocated,
    });
}
