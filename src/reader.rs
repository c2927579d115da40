use zerocopy::{FromBytes, Immutable, KnownLayout};

/// Checked, zero-copy typed views into a byte slice.
///
/// Both methods return `None` if the requested range is out of bounds or if
/// the bytes at `offset` are not aligned for `T`.
pub trait Reader {
    fn read_at<T: FromBytes + KnownLayout + Immutable>(&self, offset: u64) -> Option<&T>;
    fn read_slice_at<T: FromBytes + Immutable>(&self, offset: u64, len: usize) -> Option<&[T]>;
}

impl Reader for [u8] {
    fn read_at<T: FromBytes + KnownLayout + Immutable>(&self, offset: u64) -> Option<&T> {
        let offset: usize = offset.try_into().ok()?;
        let end: usize = offset.checked_add(core::mem::size_of::<T>())?;
        T::ref_from_bytes(self.get(offset..end)?).ok()
    }

    fn read_slice_at<T: FromBytes + Immutable>(&self, offset: u64, len: usize) -> Option<&[T]> {
        let offset: usize = offset.try_into().ok()?;
        let end: usize = offset.checked_add(core::mem::size_of::<T>().checked_mul(len)?)?;
        <[T]>::ref_from_bytes(self.get(offset..end)?).ok()
    }
}
