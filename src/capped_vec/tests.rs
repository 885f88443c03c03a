use core::alloc::Layout;
use core::cell::Cell;
use core::cmp::Ordering;
use core::ptr::NonNull;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;

use super::CappedVec;
use super::inner::Storage;
use crate::alloc::AllocError;
use crate::alloc::AltAllocator;
use crate::alloc::Global;
use crate::types::ErrorKind;
use crate::types::MAX_CAPACITY;

struct NoAlloc;

unsafe impl AltAllocator for NoAlloc {
    fn allocate(&self, _: Layout) -> Result<NonNull<[u8]>, AllocError> {
        return Err(AllocError);
    }
    unsafe fn deallocate(&self, _: NonNull<u8>, _: Layout) {
        return;
    }
}

/// Hands out a fixed number of allocations from the global allocator. Clones
/// share the same budget.
#[derive(Clone)]
struct Budget(Rc<Cell<usize>>);

impl Budget {
    fn new(allocations: usize) -> Self {
        return Self(Rc::new(Cell::new(allocations)));
    }

    fn refill(&self, allocations: usize) {
        self.0.set(allocations);
    }
}

unsafe impl AltAllocator for Budget {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let left = self.0.get();
        if left == 0 {
            return Err(AllocError);
        }
        self.0.set(left - 1);
        return Global.allocate(layout);
    }
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { Global.deallocate(ptr, layout) };
    }
}

/// Counts drops, and panics when cloned once its clone allowance runs out.
struct Tracked {
    id:          u32,
    drops:       Rc<Cell<usize>>,
    clones_left: Rc<Cell<usize>>,
}

impl Tracked {
    fn new(id: u32, drops: &Rc<Cell<usize>>, clones_left: &Rc<Cell<usize>>) -> Self {
        return Self {
            id:          id,
            drops:       drops.clone(),
            clones_left: clones_left.clone(),
        };
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        let left = self.clones_left.get();
        if left == 0 {
            panic!("clone allowance exhausted");
        }
        self.clones_left.set(left - 1);
        return Self::new(self.id, &self.drops, &self.clones_left);
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

fn ids<A: AltAllocator>(vec: &CappedVec<Tracked, A>) -> std::vec::Vec<u32> {
    return vec.as_slice().iter().map(|t| t.id).collect();
}

#[test]
fn vec_new() {
    let vec = CappedVec::<u32, NoAlloc>::new_in(NoAlloc);
    assert_eq!(vec.len(), 0);
    assert_eq!(vec.capacity(), 0);
    assert!(vec.is_empty());
    assert_eq!(vec.inner.storage(), Storage::Empty);
    assert_eq!(vec.max_size(), MAX_CAPACITY as u32);

    let vec = CappedVec::<u64, NoAlloc, u8>::new_in(NoAlloc);
    assert_eq!(vec.max_size(), u8::MAX);

    let vec = CappedVec::<u64, NoAlloc, u16>::new_in(NoAlloc);
    assert_eq!(vec.max_size(), MAX_CAPACITY as u16);
}

#[test]
fn push_fail() {
    let mut vec = CappedVec::<u32, NoAlloc>::new_in(NoAlloc);

    let ret = vec.push_back(0);
    assert!(ret.is_err());
    if let Err(e) = ret {
        assert_eq!(e.kind(), ErrorKind::AllocFailure);
    }
    assert_eq!(vec.len(), 0);
    assert_eq!(vec.capacity(), 0);
}

#[test]
fn zero_sized_never_allocates() {
    let mut vec = CappedVec::<(), NoAlloc>::new_in(NoAlloc);
    for _ in 0..MAX_CAPACITY {
        assert!(vec.push_back(()).is_ok());
    }
    assert_eq!(vec.len(), MAX_CAPACITY as u32);
    assert_eq!(vec.capacity(), MAX_CAPACITY as u32);
    assert_eq!(vec.inner.storage(), Storage::Empty);

    let ret = vec.push_back(());
    assert!(ret.is_err());
    if let Err(e) = ret {
        assert_eq!(e.kind(), ErrorKind::CapacityExceeded);
    }

    let mut vec = CappedVec::<(), NoAlloc, u8>::new_in(NoAlloc);
    for _ in 0..u8::MAX {
        assert!(vec.push_back(()).is_ok());
    }
    let ret = vec.push_back(());
    assert!(ret.is_err());
    if let Err(e) = ret {
        assert_eq!(e.kind(), ErrorKind::CapacityExceeded);
    }
}

#[test]
fn reserve_fail() {
    let mut vec = CappedVec::<u32, NoAlloc>::new_in(NoAlloc);
    assert!(vec.reserve(0).is_ok());

    let err = vec.reserve(1);
    assert!(err.is_err());
    if let Err(e) = err {
        assert_eq!(e.kind(), ErrorKind::AllocFailure);
    }

    let err = vec.reserve(MAX_CAPACITY as u32 + 1);
    assert!(err.is_err());
    if let Err(e) = err {
        assert_eq!(e.kind(), ErrorKind::CapacityExceeded);
    }

    let err = CappedVec::<u32, NoAlloc>::with_capacity_in(NoAlloc, 4);
    assert!(err.is_err());
    if let Err(e) = err {
        assert_eq!(e.kind(), ErrorKind::AllocFailure);
    }
}

#[test]
fn push_erase_insert() {
    let mut vec = CappedVec::<i32, Global>::new();
    vec.push_back(1).unwrap();
    assert_eq!(vec.capacity(), 1);
    vec.push_back(2).unwrap();
    assert_eq!(vec.capacity(), 2);
    vec.push_back(3).unwrap();
    assert_eq!(vec.capacity(), 4);
    assert_eq!(vec.len(), 3);
    assert_eq!(vec.as_slice(), &[1, 2, 3]);

    assert_eq!(vec.erase(1).unwrap(), Some(2));
    assert_eq!(vec.len(), 2);
    assert_eq!(vec.as_slice(), &[1, 3]);

    let slot = vec.insert(1, 9).unwrap();
    assert_eq!(*slot, 9);
    *slot = 10;
    assert_eq!(vec.len(), 3);
    assert_eq!(vec.as_slice(), &[1, 10, 3]);

    vec[1] = 9;
    assert_eq!(vec[1], 9);
    assert_eq!(*vec.front().unwrap(), 1);
    assert_eq!(*vec.back().unwrap(), 3);
}

#[test]
fn insert_bounds() {
    let mut vec = CappedVec::<u8, Global>::with_capacity(4).unwrap();
    vec.push_back(0xa).unwrap();
    vec.push_back(0xb).unwrap();

    for index in [4, 5, 100] {
        let err = vec.insert(index, 0xf);
        assert!(err.is_err());
        if let Err(e) = err {
            assert_eq!(e.kind(), ErrorKind::IndexOutOfRange);
        }
    }
    assert_eq!(vec.as_slice(), &[0xa, 0xb]);

    // Past the length but inside the capacity appends.
    vec.insert(3, 0xc).unwrap();
    assert_eq!(vec.as_slice(), &[0xa, 0xb, 0xc]);

    vec.insert(0, 0x9).unwrap();
    assert_eq!(vec.as_slice(), &[0x9, 0xa, 0xb, 0xc]);
    assert_eq!(vec.capacity(), 4);

    // A full vec accepts the capacity as an index and grows.
    vec.insert(4, 0xd).unwrap();
    assert_eq!(vec.as_slice(), &[0x9, 0xa, 0xb, 0xc, 0xd]);
    assert_eq!(vec.capacity(), 8);
}

#[test]
fn erase_past_length_is_noop() {
    let mut vec = CappedVec::<u8, Global>::with_capacity(4).unwrap();
    vec.push_back(1).unwrap();
    vec.push_back(2).unwrap();

    assert_eq!(vec.erase(2).unwrap(), None);
    assert_eq!(vec.erase(3).unwrap(), None);
    assert_eq!(vec.len(), 2);

    let err = vec.erase(4);
    assert!(err.is_err());
    if let Err(e) = err {
        assert_eq!(e.kind(), ErrorKind::IndexOutOfRange);
    }

    vec.push_back(3).unwrap();
    vec.push_back(4).unwrap();
    assert_eq!(vec.erase(4).unwrap(), None);
    assert_eq!(vec.erase(3).unwrap(), Some(4));
    assert_eq!(vec.erase(0).unwrap(), Some(1));
    assert_eq!(vec.as_slice(), &[2, 3]);
}

#[test]
fn checked_access() {
    let mut vec = CappedVec::<u16, Global>::with_capacity(4).unwrap();
    vec.push_back(7).unwrap();
    vec.push_back(8).unwrap();

    assert_eq!(vec.at(1).unwrap(), Some(&8));
    assert_eq!(vec.at(2).unwrap(), None);
    assert_eq!(vec.at(3).unwrap(), None);
    let err = vec.at(4);
    assert!(err.is_err());
    if let Err(e) = err {
        assert_eq!(e.kind(), ErrorKind::IndexOutOfRange);
    }

    if let Ok(Some(v)) = vec.at_mut(0) {
        *v = 70;
    }
    assert_eq!(unsafe { *vec.get_unchecked(0) }, 70);
}

#[test]
fn front_back_empty() {
    let vec = CappedVec::<u32, NoAlloc>::new_in(NoAlloc);
    let err = vec.front();
    assert!(err.is_err());
    if let Err(e) = err {
        assert_eq!(e.kind(), ErrorKind::EmptyContainer);
    }
    let err = vec.back();
    assert!(err.is_err());
    if let Err(e) = err {
        assert_eq!(e.kind(), ErrorKind::EmptyContainer);
    }
}

#[test]
fn push_pop() {
    let mut vec = CappedVec::<u8, Global>::new();
    vec.push_back(0xc).unwrap();
    vec.push_back(0xa).unwrap();
    vec.push_back(0xf).unwrap();
    vec.push_back(0xe).unwrap();

    assert_eq!(vec.pop_back(), Some(0xe));
    vec.push_back(127).unwrap();
    assert_eq!(vec[3], 127);

    assert_eq!(vec.pop_back(), Some(127));
    assert_eq!(vec.pop_back(), Some(0xf));
    assert_eq!(vec.pop_back(), Some(0xa));
    assert_eq!(vec.pop_back(), Some(0xc));
    assert_eq!(vec.pop_back(), None);
    assert_eq!(vec.capacity(), 4);
}

#[test]
fn reserve_then_shrink() {
    let mut vec = CappedVec::<u64, Global>::new();
    vec.reserve(10).unwrap();
    assert_eq!(vec.capacity(), 10);
    assert_eq!(vec.len(), 0);
    assert_eq!(vec.inner.storage(), Storage::Allocated);

    vec.reserve(3).unwrap();
    assert_eq!(vec.capacity(), 10);

    vec.shrink_to_fit().unwrap();
    assert_eq!(vec.capacity(), 0);
    assert_eq!(vec.inner.storage(), Storage::Empty);

    vec.resize(5, 42).unwrap();
    vec.reserve(6).unwrap();
    assert_eq!(vec.capacity(), 8);
    vec.reserve(20).unwrap();
    assert_eq!(vec.capacity(), 20);
    vec.shrink_to_fit().unwrap();
    assert_eq!(vec.capacity(), 5);
    assert_eq!(vec.as_slice(), &[42; 5]);
}

#[test]
fn resize_paths() {
    let mut vec = CappedVec::<u32, Global>::from_elem(3, 3).unwrap();
    assert_eq!(vec.capacity(), 4);
    assert_eq!(vec.as_slice(), &[3, 3, 3]);

    vec.resize(1, 0).unwrap();
    assert_eq!(vec.as_slice(), &[3]);
    assert_eq!(vec.capacity(), 4);

    vec.resize(4, 5).unwrap();
    assert_eq!(vec.as_slice(), &[3, 5, 5, 5]);
    assert_eq!(vec.capacity(), 4);

    vec.resize(9, 6).unwrap();
    assert_eq!(vec.as_slice(), &[3, 5, 5, 5, 6, 6, 6, 6, 6]);
    assert_eq!(vec.capacity(), 16);

    let err = vec.resize(MAX_CAPACITY as u32 + 1, 1);
    assert!(err.is_err());
    if let Err(e) = err {
        assert_eq!(e.kind(), ErrorKind::CapacityExceeded);
    }
    assert_eq!(vec.len(), 9);
    assert_eq!(vec.capacity(), 16);

    vec.resize(MAX_CAPACITY as u32, 1).unwrap();
    assert_eq!(vec.capacity(), MAX_CAPACITY as u32);

    vec.clear();
    assert!(vec.is_empty());
    assert_eq!(vec.capacity(), MAX_CAPACITY as u32);
}

#[test]
fn sized_construction() {
    let vec = CappedVec::<u32, Global>::with_len(5).unwrap();
    assert_eq!(vec.as_slice(), &[0; 5]);
    assert_eq!(vec.capacity(), 8);

    let vec = CappedVec::<u32, Global>::with_len(0).unwrap();
    assert_eq!(vec.capacity(), 0);

    let err = CappedVec::<u32, NoAlloc>::with_len_in(NoAlloc, 2);
    assert!(err.is_err());
    if let Err(e) = err {
        assert_eq!(e.kind(), ErrorKind::AllocFailure);
    }

    let err = CappedVec::<u32, Global>::from_elem(1, MAX_CAPACITY as u32 + 1);
    assert!(err.is_err());
    if let Err(e) = err {
        assert_eq!(e.kind(), ErrorKind::CapacityExceeded);
    }
}

#[test]
fn growth_failure_keeps_state() {
    let budget = Budget::new(1);
    let mut vec = CappedVec::<u32, Budget>::new_in(budget.clone());
    vec.push_back(11).unwrap();
    assert_eq!(vec.capacity(), 1);

    let err = vec.push_back(12);
    assert!(err.is_err());
    if let Err(e) = err {
        assert_eq!(e.kind(), ErrorKind::AllocFailure);
    }
    assert_eq!(vec.as_slice(), &[11]);
    assert_eq!(vec.capacity(), 1);

    let err = vec.resize(6, 0);
    assert!(err.is_err());
    assert_eq!(vec.as_slice(), &[11]);
    assert_eq!(vec.capacity(), 1);

    let err = vec.reserve(6);
    assert!(err.is_err());
    assert_eq!(vec.capacity(), 1);

    budget.refill(1);
    vec.insert(0, 10).unwrap();
    assert_eq!(vec.as_slice(), &[10, 11]);
    assert_eq!(vec.capacity(), 2);
}

#[test]
fn panicking_clone_during_growth() {
    let drops = Rc::new(Cell::new(0));
    let clones = Rc::new(Cell::new(usize::MAX));

    let mut vec = CappedVec::<Tracked, Global>::new();
    vec.push_back(Tracked::new(1, &drops, &clones)).unwrap();
    vec.push_back(Tracked::new(2, &drops, &clones)).unwrap();
    assert_eq!(vec.capacity(), 2);

    // Two clones succeed, the third panics.
    clones.set(2);
    let fill = Tracked::new(9, &drops, &clones);
    let ret = panic::catch_unwind(AssertUnwindSafe(|| vec.resize(6, fill)));
    assert!(ret.is_err());

    assert_eq!(ids(&vec), [1, 2]);
    assert_eq!(vec.capacity(), 2);
    // The two finished clones and the fill value itself.
    assert_eq!(drops.get(), 3);

    drop(vec);
    assert_eq!(drops.get(), 5);
}

#[test]
fn panicking_clone_within_capacity() {
    let drops = Rc::new(Cell::new(0));
    let clones = Rc::new(Cell::new(usize::MAX));

    let mut vec = CappedVec::<Tracked, Global>::with_capacity(8).unwrap();
    vec.push_back(Tracked::new(1, &drops, &clones)).unwrap();

    clones.set(1);
    let fill = Tracked::new(9, &drops, &clones);
    let ret = panic::catch_unwind(AssertUnwindSafe(|| vec.resize(4, fill)));
    assert!(ret.is_err());

    assert_eq!(ids(&vec), [1]);
    assert_eq!(vec.capacity(), 8);
    assert_eq!(drops.get(), 2);
}

#[test]
fn try_clone_and_assign() {
    let mut b = CappedVec::<u32, Global>::new();
    for v in 0..5 {
        b.push_back(v).unwrap();
    }
    let mut a = CappedVec::<u32, Global>::from_elem(7, 2).unwrap();
    assert_eq!(a.capacity(), 2);

    a.assign(&b).unwrap();
    assert_eq!(a.len(), 5);
    assert_eq!(a.as_slice(), b.as_slice());
    assert!(a == b);

    a[0] = 100;
    a.push_back(5).unwrap();
    assert_eq!(b.as_slice(), &[0, 1, 2, 3, 4]);
    assert_eq!(b.len(), 5);

    let c = b.try_clone().unwrap();
    assert_eq!(c.capacity(), b.capacity());
    assert_ne!(c.as_ptr(), b.as_ptr());
    assert!(c == b);
}

#[test]
fn assign_failure_keeps_state() {
    let budget = Budget::new(2);
    let mut a = CappedVec::<u32, Budget>::from_elem_in(budget.clone(), 1, 2).unwrap();
    let b = CappedVec::<u32, Budget>::from_elem_in(budget.clone(), 2, 5).unwrap();

    let err = a.assign(&b);
    assert!(err.is_err());
    if let Err(e) = err {
        assert_eq!(e.kind(), ErrorKind::AllocFailure);
    }
    assert_eq!(a.as_slice(), &[1, 1]);
    assert_eq!(a.capacity(), 2);
}

#[test]
fn panicking_clone_during_copy() {
    let drops = Rc::new(Cell::new(0));
    let clones = Rc::new(Cell::new(usize::MAX));

    let mut src = CappedVec::<Tracked, Global>::new();
    for id in 0..4 {
        src.push_back(Tracked::new(id, &drops, &clones)).unwrap();
    }
    let mut dst = CappedVec::<Tracked, Global>::new();
    dst.push_back(Tracked::new(42, &drops, &clones)).unwrap();

    clones.set(3);
    let ret = panic::catch_unwind(AssertUnwindSafe(|| dst.assign(&src)));
    assert!(ret.is_err());

    assert_eq!(ids(&dst), [42]);
    assert_eq!(ids(&src), [0, 1, 2, 3]);
    assert_eq!(drops.get(), 3);
}

#[test]
fn drops_every_live_element() {
    let drops = Rc::new(Cell::new(0));
    let clones = Rc::new(Cell::new(usize::MAX));

    let mut vec = CappedVec::<Tracked, Global>::new();
    for id in 0..6 {
        vec.push_back(Tracked::new(id, &drops, &clones)).unwrap();
    }
    let removed = vec.erase(2).unwrap();
    assert_eq!(drops.get(), 0);
    drop(removed);
    assert_eq!(drops.get(), 1);

    vec.truncate(3);
    assert_eq!(drops.get(), 3);
    assert_eq!(ids(&vec), [0, 1, 3]);

    drop(vec.pop_back());
    assert_eq!(drops.get(), 4);

    drop(vec);
    assert_eq!(drops.get(), 6);
}

#[test]
fn swap_exchanges_everything() {
    let mut a = CappedVec::<u8, Global>::from_elem(1, 3).unwrap();
    let mut b = CappedVec::<u8, Global>::with_capacity(10).unwrap();
    let a_ptr = a.as_ptr();

    a.swap(&mut b);
    assert_eq!(a.len(), 0);
    assert_eq!(a.capacity(), 10);
    assert_eq!(b.as_slice(), &[1, 1, 1]);
    assert_eq!(b.capacity(), 4);
    assert_eq!(b.as_ptr(), a_ptr);
}

#[test]
fn ordering_priority() {
    // Capacity decides before length or contents.
    let mut a = CappedVec::<u8, Global>::with_capacity(8).unwrap();
    a.push_back(0).unwrap();
    let b = CappedVec::<u8, Global>::from_elem(0xff, 4).unwrap();
    assert_eq!(a.cmp(&b), Ordering::Greater);
    assert!(a > b);

    // Then length.
    let mut c = CappedVec::<u8, Global>::with_capacity(4).unwrap();
    c.push_back(0xff).unwrap();
    assert!(c < b);

    // Then the bytes of the live elements.
    let mut d = CappedVec::<u8, Global>::with_capacity(4).unwrap();
    d.push_back(0xfe).unwrap();
    assert!(d < c);
    assert!(d <= c);
    assert!(d != c);

    let mut e = CappedVec::<u8, Global>::with_capacity(4).unwrap();
    e.push_back(0xfe).unwrap();
    assert!(d == e);
    assert!(d >= e);

    // Bytewise, not numeric: 0x0100 is [0x00, 0x01] in little endian.
    if cfg!(target_endian = "little") {
        let x = CappedVec::<u16, Global>::from_elem(0x0100, 1).unwrap();
        let y = CappedVec::<u16, Global>::from_elem(0x00ff, 1).unwrap();
        assert!(x < y);
    }
}
