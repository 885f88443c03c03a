//! Contains the allocator seam used by `CappedVec`: the `AltAllocator`
//! trait and the `AllocError` type.
//!
//! If built with the `std_alloc` feature, a wrapper called `Global` over the
//! standard allocator is also provided. With `alloc_api2`, every
//! `allocator_api2::alloc::Allocator` can back a `CappedVec` as well.

#[cfg(feature = "alloc_api2")]
mod alloc_api2;
mod alt_alloc;
#[cfg(any(feature = "std_alloc", test))]
mod std_alloc;

pub use alt_alloc::AltAllocator;
#[cfg(any(feature = "std_alloc", test))]
pub use std_alloc::Global;
use thiserror::Error;

/// This indicates some sort of memory allocation error for the alt allocator.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("A memory allocation error occurred.")]
pub struct AllocError;
