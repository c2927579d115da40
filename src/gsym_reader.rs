use std::path::Path;

use yoke::Yoke;

use crate::address_table::AddressOffsets;
use crate::byte_source::ByteSource;
use crate::data_extractor::DataExtractor;
use crate::endian::Endianness;
use crate::error::{DecodeError, Error, FormatError};
use crate::function_info::{FunctionInfo, FunctionInfoDecoder, FunctionRecordDecoder};
use crate::header::Header;
use crate::string_table::{FileEntry, StringTable};
use crate::tables::GsymTables;

/// Reads GSYM data from a file or buffer.
///
/// When the file's byte order matches ours, the header and tables are used
/// in place, as views into the mapped or copied bytes. Otherwise they are
/// decoded into host-endian copies once, during construction. Either way,
/// lookups afterwards are a binary search plus the decoding of one record.
///
/// A `GsymReader` cannot be cloned. It owns its bytes and all views into them.
pub struct GsymReader(Yoke<GsymTables<'static>, Box<ByteSource>>);

impl GsymReader {
    /// Map the GSYM file at `path` and parse it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let source = ByteSource::map_file(path.as_ref())?;
        Self::from_source(source)
    }

    /// Copy `bytes` into a new reader.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_source(ByteSource::Owned(bytes.to_vec()))
    }

    /// Take ownership of `bytes` without copying.
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self, Error> {
        Self::from_source(ByteSource::Owned(bytes))
    }

    fn from_source(source: ByteSource) -> Result<Self, Error> {
        let tables = Yoke::<GsymTables<'static>, Box<ByteSource>>::try_attach_to_cart(
            Box::new(source),
            |source| GsymTables::parse(source.as_slice()),
        )?;
        Ok(Self(tables))
    }

    fn tables(&self) -> &GsymTables<'_> {
        self.0.get()
    }

    /// The header, in host byte order.
    pub fn header(&self) -> &Header {
        &self.tables().header
    }

    /// The byte order of the GSYM data.
    pub fn endian(&self) -> Endianness {
        self.tables().endian
    }

    /// Whether the tables are views into the GSYM data rather than swapped copies.
    pub fn is_native_endian(&self) -> bool {
        self.endian().is_native()
    }

    /// Whether the data is a mapped file, as opposed to a buffer owned by the reader.
    pub fn is_mapped(&self) -> bool {
        self.0.backing_cart().is_mapped()
    }

    pub fn uuid(&self) -> &[u8] {
        self.header().uuid()
    }

    pub fn num_addresses(&self) -> usize {
        self.tables().address_offsets.len()
    }

    pub fn num_files(&self) -> usize {
        self.tables().files.len()
    }

    pub fn address_offsets(&self) -> &AddressOffsets<'_> {
        &self.tables().address_offsets
    }

    pub fn string_table(&self) -> StringTable<'_> {
        self.tables().string_table
    }

    /// Look up the function info for `address`.
    pub fn lookup(&self, address: u64) -> Result<FunctionInfo<'_>, Error> {
        self.lookup_with(address, &FunctionInfoDecoder)
    }

    /// Look up the record for `address`, decoding it with `decoder`.
    pub fn lookup_with<'a, D: FunctionRecordDecoder>(
        &'a self,
        address: u64,
        decoder: &D,
    ) -> Result<D::Record<'a>, Error> {
        let index = self.address_index(address)?;
        let record = self.decode_record_at(index, decoder)?;
        if !decoder.covers(&record, address) {
            return Err(Error::AddressNotFound(address));
        }
        Ok(record)
    }

    /// Decode the record for the address table entry at `index`.
    ///
    /// This is the second half of a lookup and can be used to iterate over
    /// all records, for `index` in `0..self.num_addresses()`.
    pub fn decode_record_at<'a, D: FunctionRecordDecoder>(
        &'a self,
        index: usize,
        decoder: &D,
    ) -> Result<D::Record<'a>, Error> {
        let tables = self.tables();
        let (start_address, offset) = match (self.address_at(index), self.info_offset_at(index)) {
            (Some(start_address), Some(offset)) => (start_address, offset),
            _ => {
                return Err(Error::AddressInfoOffsetOutOfRange {
                    index,
                    len: tables.address_info_offsets.len(),
                })
            }
        };
        let data = DataExtractor::new(tables.data, tables.endian)
            .subextractor(offset)
            .ok_or(Error::Decode {
                offset,
                source: DecodeError::OffsetOutOfBounds(offset),
            })?;
        decoder
            .decode(data, start_address)
            .map_err(|source| Error::Decode { offset, source })
    }

    /// Find the address table index of the function starting at or before `address`.
    pub fn address_index(&self, address: u64) -> Result<usize, Error> {
        let address_offset = address
            .checked_sub(self.header().base_address)
            .ok_or(Error::AddressNotFound(address))?;
        self.tables()
            .address_offsets
            .index_for_offset(address_offset)
            .ok_or(Error::AddressNotFound(address))
    }

    /// Find the address table index for an address that has already had the
    /// base address subtracted.
    pub fn address_index_for(&self, address_offset: u64) -> Result<usize, Error> {
        self.tables()
            .address_offsets
            .index_for_offset(address_offset)
            .ok_or_else(|| {
                Error::AddressNotFound(self.header().base_address.wrapping_add(address_offset))
            })
    }

    /// The address at `index` in the address table, or `None` if `index` is
    /// out of bounds.
    pub fn address_at(&self, index: usize) -> Option<u64> {
        let offset = self.tables().address_offsets.get(index)?;
        Some(self.header().base_address.wrapping_add(offset))
    }

    /// The byte offset of the function info for the address table entry at `index`.
    pub fn info_offset_at(&self, index: usize) -> Option<u64> {
        self.tables()
            .address_info_offsets
            .get(index)
            .map(|offset| u64::from(*offset))
    }

    /// The file table entry at `index`, or `None` if `index` is out of bounds.
    pub fn file_at(&self, index: u32) -> Option<FileEntry> {
        self.tables().files.get(usize::try_from(index).ok()?).copied()
    }

    /// The string at `offset` in the string table.
    ///
    /// Returns `None` if `offset` is outside the string table or the string
    /// is not valid UTF-8.
    pub fn string_at(&self, offset: u32) -> Option<&str> {
        self.tables().string_table.get(offset)
    }

    pub fn function_name(&self, info: &FunctionInfo<'_>) -> Option<&str> {
        self.string_at(info.name)
    }

    /// All addresses in the address table, in table order.
    pub fn addresses(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.num_addresses()).filter_map(move |index| self.address_at(index))
    }

    /// Check that the address table is sorted. Lookups on an unsorted table
    /// return arbitrary results, so this can be used to vet untrusted files.
    pub fn check_address_order(&self) -> Result<(), FormatError> {
        match self.tables().address_offsets.first_unsorted_index() {
            Some(index) => Err(FormatError::UnsortedAddressTable(index)),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for GsymReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GsymReader")
            .field("source", self.0.backing_cart())
            .field("endian", &self.endian())
            .field("header", self.header())
            .finish()
    }
}

#[test]
fn test_gsym_reader_is_send_and_sync() {
    fn assert_is_send<T: Send>() {}
    fn assert_is_sync<T: Sync>() {}
    assert_is_send::<GsymReader>();
    assert_is_sync::<GsymReader>();
}
