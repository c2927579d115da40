use std::borrow::Cow;
use std::ops::Range;

use yoke_derive::Yokeable;
use zerocopy::{FromBytes, Immutable};

use crate::address_table::AddressOffsets;
use crate::endian::{decode_table, Endianness, TableElement};
use crate::error::{FormatError, ReadError};
use crate::header::{AddressOffsetSize, Header};
use crate::reader::Reader;
use crate::string_table::{FileEntry, StringTable};

/// Byte ranges of the tables inside the GSYM data, validated against the
/// data's length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub address_offsets: Range<usize>,
    pub address_info_offsets: Range<usize>,
    pub files: Range<usize>,
    pub string_table: Range<usize>,
}

fn align_to(value: u64, align: u64) -> Option<u64> {
    Some(value.checked_add(align - 1)? / align * align)
}

/// `count` elements of `size` bytes at `start`, if they fit in `data_len` bytes.
fn table_range(start: u64, count: u64, size: u64, data_len: usize) -> Option<Range<usize>> {
    let end = start.checked_add(count.checked_mul(size)?)?;
    if end > data_len as u64 {
        return None;
    }
    Some(start as usize..end as usize)
}

impl TableLayout {
    /// Compute where each table lives, given a validated header.
    ///
    /// The file table's entry count is stored in the data itself, so this
    /// reads it with the file's byte order.
    pub fn compute(data: &[u8], header: &Header, endian: Endianness) -> Result<Self, FormatError> {
        let offset_size = header.address_offset_size()?.byte_size() as u64;
        let count = u64::from(header.num_addresses);

        let start = align_to(Header::SIZE as u64, offset_size).ok_or(ReadError::AddressOffsets)?;
        let address_offsets =
            table_range(start, count, offset_size, data.len()).ok_or(ReadError::AddressOffsets)?;

        let start = align_to(address_offsets.end as u64, 4).ok_or(ReadError::AddressInfoOffsets)?;
        let address_info_offsets =
            table_range(start, count, 4, data.len()).ok_or(ReadError::AddressInfoOffsets)?;

        let start = align_to(address_info_offsets.end as u64, 4).ok_or(ReadError::FileCount)?;
        let file_count_range = table_range(start, 1, 4, data.len()).ok_or(ReadError::FileCount)?;
        let file_count = endian.read_u32(&data[file_count_range.clone()]);
        let files = table_range(
            file_count_range.end as u64,
            u64::from(file_count),
            FileEntry::SIZE as u64,
            data.len(),
        )
        .ok_or(ReadError::FileTable)?;

        let string_table = table_range(
            u64::from(header.strtab_offset),
            u64::from(header.strtab_size),
            1,
            data.len(),
        )
        .ok_or(ReadError::StringTable)?;

        Ok(Self {
            address_offsets,
            address_info_offsets,
            files,
            string_table,
        })
    }
}

/// Host-endian copies of the tables of a GSYM file whose byte order is not ours.
#[derive(Debug, Clone)]
pub struct SwappedData {
    pub header: Header,
    pub address_offsets: AddressOffsets<'static>,
    pub address_info_offsets: Vec<u32>,
    pub files: Vec<FileEntry>,
}

impl SwappedData {
    pub fn decode(
        data: &[u8],
        header: Header,
        layout: &TableLayout,
        endian: Endianness,
    ) -> Result<Self, FormatError> {
        let offset_size = header.address_offset_size()?;
        Ok(Self {
            header,
            address_offsets: decode_address_offsets(
                &data[layout.address_offsets.clone()],
                offset_size,
                endian,
            ),
            address_info_offsets: decode_table(&data[layout.address_info_offsets.clone()], endian),
            files: decode_table(&data[layout.files.clone()], endian),
        })
    }
}

fn decode_address_offsets(
    bytes: &[u8],
    offset_size: AddressOffsetSize,
    endian: Endianness,
) -> AddressOffsets<'static> {
    match offset_size {
        AddressOffsetSize::U8 => AddressOffsets::U8(Cow::Owned(decode_table(bytes, endian))),
        AddressOffsetSize::U16 => AddressOffsets::U16(Cow::Owned(decode_table(bytes, endian))),
        AddressOffsetSize::U32 => AddressOffsets::U32(Cow::Owned(decode_table(bytes, endian))),
        AddressOffsetSize::U64 => AddressOffsets::U64(Cow::Owned(decode_table(bytes, endian))),
    }
}

/// A zero-copy view of a natively ordered table, or a decoded copy if the
/// bytes are not aligned for `T` in memory.
fn native_table<'data, T>(bytes: &'data [u8], what: &str) -> Cow<'data, [T]>
where
    T: TableElement + FromBytes + Immutable,
{
    if bytes.is_empty() {
        return Cow::Borrowed(&[]);
    }
    match bytes.read_slice_at::<T>(0, bytes.len() / T::SIZE) {
        Some(view) => Cow::Borrowed(view),
        None => {
            log::warn!("GSYM {what} table is not aligned in memory, copying it");
            Cow::Owned(decode_table(bytes, Endianness::NATIVE))
        }
    }
}

/// All tables of a GSYM file, in host byte order, borrowing from the file data
/// wherever possible.
#[derive(Yokeable)]
pub struct GsymTables<'data> {
    pub data: &'data [u8],
    pub endian: Endianness,
    pub header: Cow<'data, Header>,
    pub address_offsets: AddressOffsets<'data>,
    pub address_info_offsets: Cow<'data, [u32]>,
    pub files: Cow<'data, [FileEntry]>,
    pub string_table: StringTable<'data>,
}

impl<'data> GsymTables<'data> {
    pub fn parse(data: &'data [u8]) -> Result<Self, FormatError> {
        let endian = Header::detect_endian(data)?;
        let tables = if endian.is_native() {
            let header = match data.read_at::<Header>(0) {
                Some(header) => Cow::Borrowed(header),
                None => Cow::Owned(Header::decode(data, endian)?),
            };
            header.check_for_error()?;
            let layout = TableLayout::compute(data, &header, endian)?;
            log::debug!("Parsing natively ordered GSYM data, layout {layout:?}");
            Self::from_native(data, header, &layout)?
        } else {
            let header = Header::decode(data, endian)?;
            header.check_for_error()?;
            let layout = TableLayout::compute(data, &header, endian)?;
            log::debug!("Parsing {endian:?} GSYM data into swapped tables, layout {layout:?}");
            let swapped = SwappedData::decode(data, header, &layout, endian)?;
            Self::from_swapped(data, endian, swapped, &layout)
        };
        Ok(tables)
    }

    fn from_native(
        data: &'data [u8],
        header: Cow<'data, Header>,
        layout: &TableLayout,
    ) -> Result<Self, FormatError> {
        let offset_bytes = &data[layout.address_offsets.clone()];
        let address_offsets = match header.address_offset_size()? {
            AddressOffsetSize::U8 => AddressOffsets::U8(native_table(offset_bytes, "address")),
            AddressOffsetSize::U16 => AddressOffsets::U16(native_table(offset_bytes, "address")),
            AddressOffsetSize::U32 => AddressOffsets::U32(native_table(offset_bytes, "address")),
            AddressOffsetSize::U64 => AddressOffsets::U64(native_table(offset_bytes, "address")),
        };
        Ok(Self {
            data,
            endian: Endianness::NATIVE,
            header,
            address_offsets,
            address_info_offsets: native_table(
                &data[layout.address_info_offsets.clone()],
                "address info offset",
            ),
            files: native_table(&data[layout.files.clone()], "file"),
            string_table: StringTable::new(&data[layout.string_table.clone()]),
        })
    }

    fn from_swapped(
        data: &'data [u8],
        endian: Endianness,
        swapped: SwappedData,
        layout: &TableLayout,
    ) -> Self {
        let SwappedData {
            header,
            address_offsets,
            address_info_offsets,
            files,
        } = swapped;
        Self {
            data,
            endian,
            header: Cow::Owned(header),
            address_offsets,
            address_info_offsets: Cow::Owned(address_info_offsets),
            files: Cow::Owned(files),
            string_table: StringTable::new(&data[layout.string_table.clone()]),
        }
    }
}
