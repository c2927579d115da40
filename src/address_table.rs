use std::borrow::Cow;

use crate::header::AddressOffsetSize;

/// The address table: one offset from the header's base address per
/// function, sorted in ascending order.
///
/// The entry width is picked once, when the header is parsed. Every method
/// matches on the variant and then runs a loop that is monomorphic in the
/// entry type.
#[derive(Debug, Clone)]
pub enum AddressOffsets<'data> {
    U8(Cow<'data, [u8]>),
    U16(Cow<'data, [u16]>),
    U32(Cow<'data, [u32]>),
    U64(Cow<'data, [u64]>),
}

impl AddressOffsets<'_> {
    pub fn offset_size(&self) -> AddressOffsetSize {
        match self {
            AddressOffsets::U8(_) => AddressOffsetSize::U8,
            AddressOffsets::U16(_) => AddressOffsetSize::U16,
            AddressOffsets::U32(_) => AddressOffsetSize::U32,
            AddressOffsets::U64(_) => AddressOffsetSize::U64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AddressOffsets::U8(offsets) => offsets.len(),
            AddressOffsets::U16(offsets) => offsets.len(),
            AddressOffsets::U32(offsets) => offsets.len(),
            AddressOffsets::U64(offsets) => offsets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the table holds views into the file data rather than decoded copies.
    pub fn is_borrowed(&self) -> bool {
        match self {
            AddressOffsets::U8(offsets) => matches!(offsets, Cow::Borrowed(_)),
            AddressOffsets::U16(offsets) => matches!(offsets, Cow::Borrowed(_)),
            AddressOffsets::U32(offsets) => matches!(offsets, Cow::Borrowed(_)),
            AddressOffsets::U64(offsets) => matches!(offsets, Cow::Borrowed(_)),
        }
    }

    /// The address offset at `index`, widened to `u64`.
    pub fn get(&self, index: usize) -> Option<u64> {
        match self {
            AddressOffsets::U8(offsets) => offsets.get(index).map(|o| u64::from(*o)),
            AddressOffsets::U16(offsets) => offsets.get(index).map(|o| u64::from(*o)),
            AddressOffsets::U32(offsets) => offsets.get(index).map(|o| u64::from(*o)),
            AddressOffsets::U64(offsets) => offsets.get(index).copied(),
        }
    }

    /// Find the index of the last entry which is `<= address_offset`.
    ///
    /// Returns `None` if the table is empty or every entry is greater than
    /// `address_offset`. For runs of equal entries, an exact match resolves
    /// to the first entry of the run.
    pub fn index_for_offset(&self, address_offset: u64) -> Option<usize> {
        match self {
            AddressOffsets::U8(offsets) => index_for_offset(offsets, address_offset),
            AddressOffsets::U16(offsets) => index_for_offset(offsets, address_offset),
            AddressOffsets::U32(offsets) => index_for_offset(offsets, address_offset),
            AddressOffsets::U64(offsets) => index_for_offset(offsets, address_offset),
        }
    }

    /// The index of the first entry which is smaller than its predecessor, if any.
    pub fn first_unsorted_index(&self) -> Option<usize> {
        match self {
            AddressOffsets::U8(offsets) => first_unsorted_index(offsets),
            AddressOffsets::U16(offsets) => first_unsorted_index(offsets),
            AddressOffsets::U32(offsets) => first_unsorted_index(offsets),
            AddressOffsets::U64(offsets) => first_unsorted_index(offsets),
        }
    }
}

fn index_for_offset<T: Copy + Into<u64>>(offsets: &[T], address_offset: u64) -> Option<usize> {
    // Lower bound: the first entry that is >= address_offset.
    let index = offsets.partition_point(|o| (*o).into() < address_offset);
    match offsets.get(index) {
        Some(o) if (*o).into() == address_offset => Some(index),
        _ => index.checked_sub(1),
    }
}

fn first_unsorted_index<T: Copy + Ord>(offsets: &[T]) -> Option<usize> {
    offsets
        .windows(2)
        .position(|pair| pair[1] < pair[0])
        .map(|i| i + 1)
}
