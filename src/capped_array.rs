use core::cmp::Ordering;
use core::ops;

use crate::types::CappedVecErr;
use crate::types::CappedVecResult;
use crate::types::ErrorKind;
use crate::types::MAX_CAPACITY;
use crate::types::PlainBytes;
use crate::types::as_bytes;


/// A fixed size array of exactly `N` initialized elements stored inline.
///
/// The companion to [`CappedVec`](crate::CappedVec): no allocation, no
/// length separate from the capacity. `N` may not exceed [`MAX_CAPACITY`];
/// a larger `N` fails to compile as soon as an array is constructed.
#[derive(Debug, Clone)]
pub struct CappedArray<T, const N: usize> {
    data: [T; N],
}

impl<T, const N: usize> CappedArray<T, N> {
    /// Creates an array with every slot set to `T::default()`.
    pub fn new() -> Self
    where
        T: Default,
    {
        const { assert!(N <= MAX_CAPACITY, "CappedArray length exceeds MAX_CAPACITY") };
        return Self {
            data: core::array::from_fn(|_| T::default()),
        };
    }

    pub const fn from_array(data: [T; N]) -> Self {
        const { assert!(N <= MAX_CAPACITY, "CappedArray length exceeds MAX_CAPACITY") };
        return Self { data: data };
    }

    pub fn into_inner(self) -> [T; N] {
        return self.data;
    }

    /// Always `N`.
    #[inline]
    pub const fn size(&self) -> usize {
        return N;
    }

    #[inline]
    pub const fn max_size(&self) -> usize {
        return MAX_CAPACITY;
    }

    /// Fails with `IndexOutOfRange` when `index >= N`.
    pub fn at(&self, index: usize) -> CappedVecResult<&T> {
        return self.data.get(index).ok_or(CappedVecErr::new(ErrorKind::IndexOutOfRange));
    }

    pub fn at_mut(&mut self, index: usize) -> CappedVecResult<&mut T> {
        return self.data.get_mut(index).ok_or(CappedVecErr::new(ErrorKind::IndexOutOfRange));
    }

    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        return &self.data;
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        return &mut self.data;
    }

    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        return self.data.as_ptr();
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        return self.data.as_mut_ptr();
    }

    /// Sets every slot to a clone of `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.data.fill(value);
    }

    /// Swaps the contents of two arrays slot by slot.
    pub fn swap(&mut self, other: &mut Self) {
        self.data.swap_with_slice(&mut other.data);
    }
}

impl<T: Default, const N: usize> Default for CappedArray<T, N> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T, const N: usize> ops::Index<usize> for CappedArray<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        return &self.data[index];
    }
}

impl<T, const N: usize> ops::IndexMut<usize> for CappedArray<T, N> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        return &mut self.data[index];
    }
}

// Arrays of the same `N` compare by the raw bytes of their storage.

impl<T: PlainBytes, const N: usize> PartialEq for CappedArray<T, N> {
    fn eq(&self, other: &Self) -> bool {
        return as_bytes(&self.data) == as_bytes(&other.data);
    }
}

impl<T: PlainBytes, const N: usize> Eq for CappedArray<T, N> {}

impl<T: PlainBytes, const N: usize> PartialOrd for CappedArray<T, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

impl<T: PlainBytes, const N: usize> Ord for CappedArray<T, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        return as_bytes(&self.data).cmp(as_bytes(&other.data));
    }
}
