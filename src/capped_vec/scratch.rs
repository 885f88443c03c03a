use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem;
use core::ptr;

use super::inner::Block;
use super::inner::Storage;
use super::inner::allocate_block;
use super::inner::layout_array;
use crate::alloc::AltAllocator;
use crate::types::CappedVecResult;

/// Drops a run of slots written in place if it is dropped before `finish`.
///
/// Used to grow a `CappedVec` inside its existing capacity, so a panicking
/// constructor leaves the length and contents as they were.
pub(crate) struct FillGuard<T> {
    base:   *mut T,
    start:  usize,
    filled: usize,
}

impl<T> FillGuard<T> {
    /// # Safety
    /// `base.add(start)` onward must be writable, uninitialized slots.
    pub(crate) unsafe fn new(base: *mut T, start: usize) -> Self {
        return Self {
            base:   base,
            start:  start,
            filled: 0,
        };
    }

    /// # Safety
    /// The slot after the last one written must still be within the buffer.
    #[inline]
    pub(crate) unsafe fn push(&mut self, value: T) {
        unsafe { ptr::write(self.base.add(self.start + self.filled), value) };
        self.filled += 1;
    }

    /// Keeps the written slots and returns how many there were.
    pub(crate) fn finish(self) -> usize {
        let filled = self.filled;
        mem::forget(self);
        return filled;
    }
}

impl<T> Drop for FillGuard<T> {
    fn drop(&mut self) {
        let run = ptr::slice_from_raw_parts_mut(unsafe { self.base.add(self.start) }, self.filled);
        unsafe { ptr::drop_in_place(run) };
    }
}

/// A freshly allocated buffer that a `CappedVec` builds its next state in.
///
/// Until `finish` is called the scratch owns both the block and every value
/// written into it; dropping it drops those values and frees the block, so
/// a failure while building leaves the vec it was meant for untouched.
pub(crate) struct Scratch<'a, T, A: AltAllocator> {
    block:  Block,
    start:  usize,
    filled: usize,
    alloc:  &'a A,
    _ph:    PhantomData<T>,
}

impl<'a, T, A: AltAllocator> Scratch<'a, T, A> {
    /// Allocates `capacity` slots. Values pushed land at `start` onward.
    pub(crate) fn new_in(alloc: &'a A, capacity: usize, start: usize) -> CappedVecResult<Self> {
        debug_assert!(start <= capacity);
        let block = allocate_block::<T, A>(alloc, capacity)?;
        return Ok(Self {
            block:  block,
            start:  start,
            filled: 0,
            alloc:  alloc,
            _ph:    PhantomData,
        });
    }

    #[inline]
    fn slots(&self) -> *mut T {
        return self.block.ptr.as_ptr().cast();
    }

    /// # Safety
    /// Fewer than `capacity - start` values may have been pushed so far.
    #[inline]
    pub(crate) unsafe fn push(&mut self, value: T) {
        debug_assert!(self.start + self.filled < self.block.capacity);
        unsafe { ptr::write(self.slots().add(self.start + self.filled), value) };
        self.filled += 1;
    }

    /// Moves `count` values from `src` into the front of the scratch buffer.
    ///
    /// # Safety
    /// `count` must equal the `start` given to `new_in`, and `src` must hold
    /// `count` initialized values that the caller will treat as moved out.
    pub(crate) unsafe fn relocate_front(&mut self, src: *const T, count: usize) {
        debug_assert_eq!(count, self.start);
        unsafe { ptr::copy_nonoverlapping(src, self.slots(), count) };
        self.start = 0;
        self.filled += count;
    }

    /// Hands the block over, initialized values and all.
    pub(crate) fn finish(self) -> Block {
        let block = Block {
            ptr:      self.block.ptr,
            capacity: self.block.capacity,
            storage:  self.block.storage,
        };
        log::trace!("committing scratch buffer of {} slots", block.capacity);
        mem::forget(self);
        return block;
    }
}

impl<T, A: AltAllocator> Drop for Scratch<'_, T, A> {
    fn drop(&mut self) {
        let run = ptr::slice_from_raw_parts_mut(unsafe { self.slots().add(self.start) }, self.filled);
        unsafe { ptr::drop_in_place(run) };

        if self.block.storage == Storage::Allocated {
            if let Ok(layout) = layout_array(Layout::new::<T>(), self.block.capacity) {
                unsafe { self.alloc.deallocate(self.block.ptr, layout) };
            }
        }
        log::debug!("discarded scratch buffer of {} slots", self.block.capacity);
    }
}
