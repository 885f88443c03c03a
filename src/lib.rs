//! # Capped Vec
//!
//! The `capped_vec` crate provides a `#[no_std]` growable array, `CappedVec`, that
//! manages its own storage and never holds more than [`MAX_CAPACITY`](types::MAX_CAPACITY)
//! elements, along with `CappedArray`, its fixed size inline counterpart.
//!
//! `CappedVec` uses fallible allocations. Instead of panicking or aborting when the
//! allocator fails it returns an error, and every operation that can fail leaves the
//! vec exactly as it was before the call. Growth doubles the capacity until the
//! request fits, clamped to the cap.
//!
//! The type used for the length, capacity and indices is a generic parameter, and
//! storage comes from an `AltAllocator`, a stable stand-in for the unstable
//! `Allocator` trait.
//!
//! ```
//! use capped_vec::CappedVec;
//! use capped_vec::alloc::Global;
//!
//! let mut v = CappedVec::<i32, Global>::new();
//! v.push_back(1)?;
//! v.push_back(2)?;
//! v.push_back(3)?;
//! assert_eq!(v.erase(1)?, Some(2));
//! v.insert(1, 9)?;
//! assert_eq!(v.as_slice(), &[1, 9, 3]);
//! assert_eq!(v.capacity(), 4);
//! # Ok::<(), capped_vec::types::CappedVecErr>(())
//! ```
//!
//! # Feature Flags
//! * `std_alloc` - Enables `Global`, a wrapper that implements `AltAllocator` using the
//!   standard allocator APIs.
//!
//! * `alloc_api2` - Implements `AltAllocator` for every `allocator_api2::alloc::Allocator`.

#![no_std]

#[cfg(any(feature = "std_alloc", test))]
extern crate std;

pub mod alloc;
mod capped_array;
mod capped_vec;
pub mod types;

pub use capped_array::CappedArray;
pub use capped_vec::CappedVec;
