use core::fmt;
use core::hash::Hash;

/// This trait is used for letting you specify the type of the length and
/// capacity fields of a `CappedVec`, as well as its indexing operations.
/// If you have some other type that behaves like an unsigned integer,
/// you can implement this trait for it.
///
/// It's marked as unsafe since `as_usize` and `from_usize` must round trip
/// for every value up to `MAX_VALUE`, and the ordering of `Self` must agree
/// with the ordering of those `usize` values. The container's unsafe code
/// trusts both.
pub unsafe trait LengthType
where
    Self: Copy,
    Self: Ord,
    Self: Hash,
    Self: fmt::Debug,
    Self: Sized,
{
    const MAX_VALUE: Self;
    const ONE_VALUE: Self;
    const ZERO_VALUE: Self;

    fn as_usize(self) -> usize;
    fn from_usize(value: usize) -> Option<Self>;
}

macro_rules! impl_length_type {
    ($typ:ty) => {
        unsafe impl LengthType for $typ {
            const MAX_VALUE: Self = Self::MAX;
            const ONE_VALUE: Self = 1;
            const ZERO_VALUE: Self = 0;

            #[inline(always)]
            fn as_usize(self) -> usize {
                // Saturates on targets where `usize` is narrower than `Self`.
                return usize::try_from(self).unwrap_or(usize::MAX);
            }

            #[inline]
            fn from_usize(value: usize) -> Option<Self> {
                return Self::try_from(value).ok();
            }
        }
    };
}

impl_length_type!(usize);
impl_length_type!(u8);
impl_length_type!(u16);
impl_length_type!(u32);
impl_length_type!(u64);
