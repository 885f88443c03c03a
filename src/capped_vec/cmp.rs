use core::cmp::Ordering;

use super::CappedVec;
use crate::alloc::AltAllocator;
use crate::types::LengthType;
use crate::types::PlainBytes;
use crate::types::as_bytes;

// Vecs order by capacity first, then by length, and only then by the raw
// bytes of their live elements.

impl<T: PlainBytes, A: AltAllocator, L: LengthType> PartialEq for CappedVec<T, A, L> {
    fn eq(&self, other: &Self) -> bool {
        return self.capacity() == other.capacity()
            && self.len() == other.len()
            && as_bytes(self.as_slice()) == as_bytes(other.as_slice());
    }
}

impl<T: PlainBytes, A: AltAllocator, L: LengthType> Eq for CappedVec<T, A, L> {}

impl<T: PlainBytes, A: AltAllocator, L: LengthType> PartialOrd for CappedVec<T, A, L> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

impl<T: PlainBytes, A: AltAllocator, L: LengthType> Ord for CappedVec<T, A, L> {
    fn cmp(&self, other: &Self) -> Ordering {
        return self
            .capacity()
            .cmp(&other.capacity())
            .then_with(|| self.len().cmp(&other.len()))
            .then_with(|| as_bytes(self.as_slice()).cmp(as_bytes(other.as_slice())));
    }
}
