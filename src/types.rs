//! Error, length and comparison types shared by `CappedVec` and `CappedArray`.

mod capacity;
mod errors;
mod len_type;
mod plain_bytes;

pub use capacity::calculate_enough_capacity;
pub use errors::*;
pub use len_type::LengthType;
pub use plain_bytes::PlainBytes;
pub(crate) use plain_bytes::as_bytes;

/// The hard upper bound on the number of elements either container will
/// ever hold, regardless of the length type in use.
pub const MAX_CAPACITY: usize = 1024;
