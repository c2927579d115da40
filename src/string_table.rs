use memchr::memchr;
use zerocopy_derive::{FromBytes, Immutable, KnownLayout};

use crate::endian::{Endianness, TableElement};

/// An entry in the file table. Both fields are string table offsets.
#[derive(FromBytes, KnownLayout, Immutable, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct FileEntry {
    /// String table offset of the directory.
    pub dir: u32,
    /// String table offset of the file name.
    pub base: u32,
}

impl TableElement for FileEntry {
    const SIZE: usize = 8;

    fn decode(bytes: &[u8], endian: Endianness) -> Self {
        FileEntry {
            dir: endian.read_u32(&bytes[0..4]),
            base: endian.read_u32(&bytes[4..8]),
        }
    }
}

/// The GSYM string table: NUL-terminated strings addressed by byte offset.
///
/// The string table is byte-oriented and never needs byte swapping, so it is
/// always a view into the original data.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringTable<'data> {
    data: &'data [u8],
}

impl<'data> StringTable<'data> {
    pub fn new(data: &'data [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The bytes of the string at `offset`, up to (not including) the next NUL
    /// or the end of the table.
    ///
    /// Returns `None` if `offset` is outside the table.
    pub fn get_bytes(&self, offset: u32) -> Option<&'data [u8]> {
        let rest = self.data.get(usize::try_from(offset).ok()?..)?;
        if rest.is_empty() {
            return None;
        }
        let len = memchr(0, rest).unwrap_or(rest.len());
        Some(&rest[..len])
    }

    /// The string at `offset`, or `None` if `offset` is outside the table or
    /// the string is not valid UTF-8.
    pub fn get(&self, offset: u32) -> Option<&'data str> {
        std::str::from_utf8(self.get_bytes(offset)?).ok()
    }
}
