/// Marker for element types whose every byte is initialized and carries
/// meaning, so comparing two values bytewise is sound.
///
/// The containers use this for their ordering and equality, which compare
/// raw storage the way `memcmp` would rather than by `T: Ord`.
///
/// # Safety
/// Implementors must have no padding bytes and no interior pointers whose
/// address would make two equal values compare differently.
pub unsafe trait PlainBytes: Copy {}

macro_rules! impl_plain_bytes {
    ($($typ:ty),*) => {
        $(unsafe impl PlainBytes for $typ {})*
    };
}

impl_plain_bytes!(u8, u16, u32, u64, u128, usize);
impl_plain_bytes!(i8, i16, i32, i64, i128, isize);
impl_plain_bytes!(f32, f64, bool, char);

unsafe impl<T: PlainBytes, const N: usize> PlainBytes for [T; N] {}

/// Views `items` as the bytes backing them.
#[inline]
pub(crate) fn as_bytes<T: PlainBytes>(items: &[T]) -> &[u8] {
    // Safety: `PlainBytes` guarantees no padding, so every byte is initialized.
    return unsafe { core::slice::from_raw_parts(items.as_ptr().cast::<u8>(), size_of_val(items)) };
}
