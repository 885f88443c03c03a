use thiserror::Error;

/// This enum lets one figure out what kind of error occurred during
/// a `CappedVec` or `CappedArray` operation.
#[repr(u8)]
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested number of elements is larger than the container's `max_size()`.
    #[error("Requested size exceeds the maximum capacity.")]
    CapacityExceeded = 1,
    /// An index was past the bound an operation permits.
    #[error("Index out of range.")]
    IndexOutOfRange,
    /// `front()` or `back()` was called on an empty container.
    #[error("Accessed an element of an empty container.")]
    EmptyContainer,
    #[error("usize overflowed.")]
    UsizeOverflow,
    #[error("Failed to create layout.")]
    LayoutFailure,
    #[error("An allocation failure occurred.")]
    AllocFailure,
}

/// A type alias for `Result<T, CappedVecErr>`
pub type CappedVecResult<T> = Result<T, CappedVecErr>;

/// This is used to indicate an error during a container operation.
#[repr(transparent)]
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error(transparent)]
pub struct CappedVecErr(ErrorKind);

impl CappedVecErr {
    pub(crate) const fn new(kind: ErrorKind) -> Self {
        return Self(kind);
    }

    pub const fn kind(self) -> ErrorKind {
        return self.0;
    }
}

impl From<ErrorKind> for CappedVecErr {
    fn from(kind: ErrorKind) -> Self {
        return Self::new(kind);
    }
}
