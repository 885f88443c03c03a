use core::fmt;
use core::ops;
use core::ptr;
use core::slice;

use super::inner::Inner;
use super::scratch::FillGuard;
use super::scratch::Scratch;
use crate::alloc::AltAllocator;
#[cfg(any(feature = "std_alloc", test))]
use crate::alloc::Global;
use crate::types::CappedVecErr;
use crate::types::CappedVecResult;
use crate::types::ErrorKind;
use crate::types::LengthType;
use crate::types::MAX_CAPACITY;
use crate::types::calculate_enough_capacity;

/// A contiguous, growable array that owns its elements and never holds more
/// than [`MAX_CAPACITY`] of them.
///
/// Every slot in `[0, len)` holds a live `T`; slots in `[len, capacity)` are
/// allocated but uninitialized. Growth follows
/// [`calculate_enough_capacity`], except for `reserve` which allocates the
/// exact amount asked for.
///
/// Operations that can fail return a [`CappedVecResult`]. When they do, the
/// vec is left exactly as it was before the call. That also holds when an
/// element's `Clone` or `Default` panics partway through `resize`,
/// `try_clone` or `assign`.
///
/// `L` is the type used for lengths, capacities and indices.
pub struct CappedVec<T, A: AltAllocator, L: LengthType = u32> {
    pub(super) inner: Inner<T, L, A>,
    len:              L,
}

// The buffer is uniquely owned, so thread safety follows `T` and `A`.
unsafe impl<T: Send, A: AltAllocator + Send, L: LengthType + Send> Send for CappedVec<T, A, L> {}
unsafe impl<T: Sync, A: AltAllocator + Sync, L: LengthType + Sync> Sync for CappedVec<T, A, L> {}

#[cfg(any(feature = "std_alloc", test))]
impl<T, L: LengthType> CappedVec<T, Global, L> {
    /// Creates an empty vec backed by the global allocator. Nothing is allocated.
    pub const fn new() -> Self {
        return Self::new_in(Global);
    }

    pub fn with_capacity(capacity: L) -> CappedVecResult<Self> {
        return Self::with_capacity_in(Global, capacity);
    }

    pub fn from_elem(value: T, len: L) -> CappedVecResult<Self>
    where
        T: Clone,
    {
        return Self::from_elem_in(Global, value, len);
    }

    pub fn with_len(len: L) -> CappedVecResult<Self>
    where
        T: Default,
    {
        return Self::with_len_in(Global, len);
    }
}

#[cfg(any(feature = "std_alloc", test))]
impl<T, L: LengthType> Default for CappedVec<T, Global, L> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T, A: AltAllocator, L: LengthType> CappedVec<T, A, L> {
    /// Creates an empty vec with zero capacity. Nothing is allocated.
    pub const fn new_in(alloc: A) -> Self {
        return Self {
            inner: Inner::new_in(alloc),
            len:   L::ZERO_VALUE,
        };
    }

    /// Creates an empty vec with room for exactly `capacity` elements.
    pub fn with_capacity_in(alloc: A, capacity: L) -> CappedVecResult<Self> {
        let capacity = capacity.as_usize();
        if capacity > Self::limit() {
            return Err(CappedVecErr::new(ErrorKind::CapacityExceeded));
        }
        return Ok(Self {
            inner: Inner::with_capacity_in(alloc, capacity)?,
            len:   L::ZERO_VALUE,
        });
    }

    /// Creates a vec holding `len` clones of `value`.
    ///
    /// The capacity is the smallest power of two covering `len`, clamped to
    /// `max_size()`.
    pub fn from_elem_in(alloc: A, value: T, len: L) -> CappedVecResult<Self>
    where
        T: Clone,
    {
        let mut vec = Self::new_in(alloc);
        vec.resize(len, value)?;
        return Ok(vec);
    }

    /// Creates a vec holding `len` default constructed elements.
    pub fn with_len_in(alloc: A, len: L) -> CappedVecResult<Self>
    where
        T: Default,
    {
        let mut vec = Self::new_in(alloc);
        vec.resize_with(len, T::default)?;
        return Ok(vec);
    }

    fn limit() -> usize {
        return MAX_CAPACITY.min(L::MAX_VALUE.as_usize());
    }

    /// The most elements this vec can ever hold: [`MAX_CAPACITY`] or the
    /// largest `L`, whichever is smaller.
    pub fn max_size(&self) -> L {
        return L::from_usize(Self::limit()).unwrap_or(L::MAX_VALUE);
    }

    #[inline]
    pub const fn capacity(&self) -> L {
        return self.inner.capacity();
    }

    #[inline]
    pub const fn len(&self) -> L {
        return self.len;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.len == L::ZERO_VALUE;
    }

    #[inline]
    pub const fn allocator(&self) -> &A {
        return self.inner.allocator();
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len.as_usize()) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len.as_usize()) }
    }

    /// Pointer to the start of the storage. Dangling while nothing is allocated.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        return self.inner.get_ptr();
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        return self.inner.get_ptr();
    }

    pub fn front(&self) -> CappedVecResult<&T> {
        return self.as_slice().first().ok_or(CappedVecErr::new(ErrorKind::EmptyContainer));
    }

    pub fn front_mut(&mut self) -> CappedVecResult<&mut T> {
        return self.as_mut_slice().first_mut().ok_or(CappedVecErr::new(ErrorKind::EmptyContainer));
    }

    pub fn back(&self) -> CappedVecResult<&T> {
        return self.as_slice().last().ok_or(CappedVecErr::new(ErrorKind::EmptyContainer));
    }

    pub fn back_mut(&mut self) -> CappedVecResult<&mut T> {
        return self.as_mut_slice().last_mut().ok_or(CappedVecErr::new(ErrorKind::EmptyContainer));
    }

    /// Checked access against the capacity.
    ///
    /// Fails with `IndexOutOfRange` only when `index >= capacity()`. An index
    /// inside the capacity but past the length addresses an uninitialized
    /// slot and yields `Ok(None)`.
    pub fn at(&self, index: L) -> CappedVecResult<Option<&T>> {
        let index = index.as_usize();
        if index >= self.capacity().as_usize() {
            return Err(CappedVecErr::new(ErrorKind::IndexOutOfRange));
        }
        return Ok(self.as_slice().get(index));
    }

    /// The mutable counterpart of [`CappedVec::at`].
    pub fn at_mut(&mut self, index: L) -> CappedVecResult<Option<&mut T>> {
        let index = index.as_usize();
        if index >= self.capacity().as_usize() {
            return Err(CappedVecErr::new(ErrorKind::IndexOutOfRange));
        }
        return Ok(self.as_mut_slice().get_mut(index));
    }

    /// # Safety
    /// `index` must be less than `len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: L) -> &T {
        debug_assert!(index < self.len);
        return unsafe { &*self.as_ptr().add(index.as_usize()) };
    }

    /// # Safety
    /// `index` must be less than `len()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: L) -> &mut T {
        debug_assert!(index < self.len);
        return unsafe { &mut *self.as_mut_ptr().add(index.as_usize()) };
    }

    /// Makes sure the capacity is at least `capacity`.
    ///
    /// Unlike growth triggered by `push_back` or `resize`, this allocates
    /// exactly `capacity` slots. Does nothing if the capacity is already large
    /// enough. On failure the vec keeps its old buffer.
    pub fn reserve(&mut self, capacity: L) -> CappedVecResult<()> {
        let wanted = capacity.as_usize();
        if wanted <= self.capacity().as_usize() {
            return Ok(());
        }
        if wanted > Self::limit() {
            log::warn!("reserve of {} slots exceeds the limit of {}", wanted, Self::limit());
            return Err(CappedVecErr::new(ErrorKind::CapacityExceeded));
        }
        return unsafe { self.inner.reallocate(wanted, self.len.as_usize()) };
    }

    /// Reallocates so the capacity equals the length. An empty vec releases
    /// its storage entirely.
    pub fn shrink_to_fit(&mut self) -> CappedVecResult<()> {
        let len = self.len.as_usize();
        if self.capacity().as_usize() == len {
            return Ok(());
        }
        return unsafe { self.inner.reallocate(len, len) };
    }

    /// Resizes to `new_len`, cloning `value` into any new slots.
    ///
    /// Shrinking drops the tail and keeps the capacity. Growing past the
    /// capacity builds the new buffer off to the side and only swaps it in
    /// once every clone succeeded. Fails with `CapacityExceeded` when
    /// `new_len > max_size()`.
    pub fn resize(&mut self, new_len: L, value: T) -> CappedVecResult<()>
    where
        T: Clone,
    {
        return self.resize_with(new_len, || value.clone());
    }

    /// Resizes to `new_len`, filling new slots with `T::default()`.
    pub fn resize_default(&mut self, new_len: L) -> CappedVecResult<()>
    where
        T: Default,
    {
        return self.resize_with(new_len, T::default);
    }

    /// Resizes to `new_len`, filling new slots with values returned by `fill`.
    pub fn resize_with<F>(&mut self, new_len: L, mut fill: F) -> CappedVecResult<()>
    where
        F: FnMut() -> T,
    {
        let target = new_len.as_usize();
        if target > Self::limit() {
            log::warn!("resize to {} exceeds the limit of {}", target, Self::limit());
            return Err(CappedVecErr::new(ErrorKind::CapacityExceeded));
        }

        let len = self.len.as_usize();
        if target <= len {
            self.truncate(new_len);
            return Ok(());
        }

        let capacity = self.capacity().as_usize();
        if target <= capacity {
            let mut guard = unsafe { FillGuard::new(self.as_mut_ptr(), len) };
            for _ in len..target {
                unsafe { guard.push(fill()) };
            }
            guard.finish();
            self.len = new_len;
            return Ok(());
        }

        let new_cap = calculate_enough_capacity(capacity, target, Self::limit())?;
        let mut scratch = Scratch::<T, A>::new_in(self.inner.allocator(), new_cap, len)?;
        for _ in len..target {
            unsafe { scratch.push(fill()) };
        }
        // Nothing below can fail, so the old elements can move now.
        unsafe { scratch.relocate_front(self.as_ptr(), len) };
        let block = scratch.finish();
        unsafe { self.inner.adopt(block) };
        self.len = new_len;
        return Ok(());
    }

    /// Drops every element past `new_len`. Does nothing if the vec is
    /// already that short.
    pub fn truncate(&mut self, new_len: L) {
        if new_len >= self.len {
            return;
        }
        let old = self.len.as_usize();
        let keep = new_len.as_usize();
        // Shorten first so a panicking destructor cannot cause a double drop.
        self.len = new_len;
        let tail = ptr::slice_from_raw_parts_mut(unsafe { self.as_mut_ptr().add(keep) }, old - keep);
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drops all elements. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(L::ZERO_VALUE);
    }

    /// Inserts `value` at `index`, shifting later elements right.
    ///
    /// Fails with `IndexOutOfRange` when `index > capacity()`, or when
    /// `index == capacity()` while the vec is not full. An index between the
    /// length and the capacity is treated as the length, appending the value.
    /// Growing follows the capacity policy; if that fails nothing has moved.
    ///
    /// Returns a reference to the inserted element.
    pub fn insert(&mut self, index: L, value: T) -> CappedVecResult<&mut T> {
        let len = self.len.as_usize();
        let capacity = self.capacity().as_usize();
        let index = self.check_index(index.as_usize())?.min(len);

        let Some(new_len) = L::from_usize(len + 1) else {
            return Err(CappedVecErr::new(ErrorKind::CapacityExceeded));
        };
        if len == capacity {
            let new_cap = calculate_enough_capacity(capacity, len + 1, Self::limit())?;
            unsafe { self.inner.reallocate(new_cap, len)? };
        }

        let slot = unsafe { self.as_mut_ptr().add(index) };
        unsafe {
            ptr::copy(slot, slot.add(1), len - index);
            ptr::write(slot, value);
        }
        self.len = new_len;
        return Ok(unsafe { &mut *slot });
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// left.
    ///
    /// Bounds are checked like [`CappedVec::insert`]. An index that passes the
    /// check but is not below the length removes nothing and returns
    /// `Ok(None)`.
    pub fn erase(&mut self, index: L) -> CappedVecResult<Option<T>> {
        let len = self.len.as_usize();
        let index = self.check_index(index.as_usize())?;
        if index >= len {
            return Ok(None);
        }

        let removed;
        unsafe {
            let slot = self.as_mut_ptr().add(index);
            removed = ptr::read(slot);
            ptr::copy(slot.add(1), slot, len - index - 1);
        }
        self.len = L::from_usize(len - 1).unwrap_or(L::ZERO_VALUE);
        return Ok(Some(removed));
    }

    fn check_index(&self, index: usize) -> CappedVecResult<usize> {
        let len = self.len.as_usize();
        let capacity = self.capacity().as_usize();
        if index > capacity || (index == capacity && len != capacity) {
            return Err(CappedVecErr::new(ErrorKind::IndexOutOfRange));
        }
        return Ok(index);
    }

    /// Appends `value`, growing by the capacity policy when full.
    pub fn push_back(&mut self, value: T) -> CappedVecResult<&mut T> {
        return self.insert(self.len, value);
    }

    /// Removes the last element, or returns `None` if the vec is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let last = self.len.as_usize() - 1;
        self.len = L::from_usize(last).unwrap_or(L::ZERO_VALUE);
        return Some(unsafe { ptr::read(self.as_ptr().add(last)) });
    }

    /// Exchanges the contents, capacity and allocator of two vecs without
    /// touching any element.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Makes a deep copy with the same capacity. Only live elements are cloned.
    pub fn try_clone(&self) -> CappedVecResult<Self>
    where
        T: Clone,
        A: Clone,
    {
        let alloc = self.allocator().clone();
        let capacity = self.capacity().as_usize();

        let mut scratch = Scratch::<T, A>::new_in(&alloc, capacity, 0)?;
        for item in self.as_slice() {
            unsafe { scratch.push(item.clone()) };
        }
        let block = scratch.finish();

        let mut inner = Inner::new_in(alloc);
        unsafe { inner.adopt(block) };
        return Ok(Self {
            inner: inner,
            len:   self.len,
        });
    }

    /// Replaces the contents with a deep copy of `other`.
    ///
    /// The copy is made before anything is replaced, so on failure `self`
    /// is left as it was.
    pub fn assign(&mut self, other: &Self) -> CappedVecResult<()>
    where
        T: Clone,
        A: Clone,
    {
        let mut copy = other.try_clone()?;
        self.swap(&mut copy);
        return Ok(());
    }
}

impl<T, A: AltAllocator, L: LengthType> Drop for CappedVec<T, A, L> {
    fn drop(&mut self) {
        unsafe { ptr::drop_in_place(self.as_mut_slice()) };
    }
}

impl<T, A: AltAllocator, L: LengthType> ops::Index<L> for CappedVec<T, A, L> {
    type Output = T;

    #[inline]
    fn index(&self, index: L) -> &T {
        return &self.as_slice()[index.as_usize()];
    }
}

impl<T, A: AltAllocator, L: LengthType> ops::IndexMut<L> for CappedVec<T, A, L> {
    #[inline]
    fn index_mut(&mut self, index: L) -> &mut T {
        return &mut self.as_mut_slice()[index.as_usize()];
    }
}

impl<T: fmt::Debug, A: AltAllocator, L: LengthType> fmt::Debug for CappedVec<T, A, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.as_slice()).finish();
    }
}
