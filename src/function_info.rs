use std::ops::Range;

use crate::data_extractor::DataExtractor;
use crate::error::DecodeError;

/// Turns the bytes at a function record's offset into a record.
///
/// [`GsymReader::lookup_with`](crate::GsymReader::lookup_with) resolves an
/// address to a record offset and hands the decoding to an implementation of
/// this trait. The reader never looks inside the records itself.
pub trait FunctionRecordDecoder {
    type Record<'data>;

    /// Decode the record at the start of `data`.
    ///
    /// `data` extends to the end of the GSYM data and uses the file's byte
    /// order. `start_address` is the address table entry that led to this
    /// record.
    fn decode<'data>(
        &self,
        data: DataExtractor<'data>,
        start_address: u64,
    ) -> Result<Self::Record<'data>, DecodeError>;

    /// Whether `record` describes code at `address`. Lookups for addresses
    /// which the matched record does not cover fail with
    /// [`Error::AddressNotFound`](crate::Error::AddressNotFound).
    fn covers(&self, record: &Self::Record<'_>, address: u64) -> bool {
        let _ = (record, address);
        true
    }
}

/// The kinds of data chunks which can follow the fixed part of a function info record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum InfoType {
    EndOfList = 0,
    LineTableInfo = 1,
    InlineInfo = 2,
}

impl InfoType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::EndOfList),
            1 => Some(Self::LineTableInfo),
            2 => Some(Self::InlineInfo),
            _ => None,
        }
    }
}

/// The envelope of a GSYM function info record.
///
/// The line table and inline info chunks are kept as raw bytes in the file's
/// byte order; interpreting them is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo<'data> {
    /// The address range of the function.
    pub range: Range<u64>,
    /// String table offset of the function name.
    pub name: u32,
    pub line_table: Option<&'data [u8]>,
    pub inline_info: Option<&'data [u8]>,
}

impl FunctionInfo<'_> {
    pub fn size(&self) -> u64 {
        self.range.end - self.range.start
    }
}

/// Decodes [`FunctionInfo`] records. This is what [`GsymReader::lookup`](crate::GsymReader::lookup) uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionInfoDecoder;

impl FunctionRecordDecoder for FunctionInfoDecoder {
    type Record<'data> = FunctionInfo<'data>;

    fn decode<'data>(
        &self,
        data: DataExtractor<'data>,
        start_address: u64,
    ) -> Result<FunctionInfo<'data>, DecodeError> {
        let truncated = |offset, what| DecodeError::Truncated { offset, what };
        let mut offset = 0;
        let size = data
            .read_u32(&mut offset)
            .ok_or_else(|| truncated(offset, "FunctionInfo Size"))?;
        let name = data
            .read_u32(&mut offset)
            .ok_or_else(|| truncated(offset, "FunctionInfo Name"))?;
        if name == 0 {
            return Err(DecodeError::InvalidName(name));
        }

        let mut line_table = None;
        let mut inline_info = None;
        loop {
            let info_type_offset = offset;
            let info_type = data
                .read_u32(&mut offset)
                .ok_or_else(|| truncated(offset, "FunctionInfo InfoType value"))?;
            let length = data
                .read_u32(&mut offset)
                .ok_or_else(|| truncated(offset, "FunctionInfo InfoType length"))?;
            let bytes = data
                .read_bytes(&mut offset, u64::from(length))
                .ok_or_else(|| truncated(offset, "FunctionInfo InfoType data"))?;
            match InfoType::from_u32(info_type) {
                Some(InfoType::EndOfList) => break,
                Some(InfoType::LineTableInfo) => line_table = Some(bytes),
                Some(InfoType::InlineInfo) => inline_info = Some(bytes),
                None => {
                    return Err(DecodeError::UnsupportedInfoType {
                        offset: info_type_offset,
                        info_type,
                    })
                }
            }
        }

        Ok(FunctionInfo {
            range: start_address..start_address.saturating_add(u64::from(size)),
            name,
            line_table,
            inline_info,
        })
    }

    fn covers(&self, record: &FunctionInfo<'_>, address: u64) -> bool {
        record.range.is_empty() || record.range.contains(&address)
    }
}
