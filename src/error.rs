use std::path::PathBuf;

use thiserror::Error;

/// The error type returned by [`GsymReader`](crate::GsymReader).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Could not read GSYM file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid GSYM data: {0}")]
    Format(
        #[from]
        #[source]
        FormatError,
    ),

    /// The address is below the first function in the file, or the
    /// matching function's range does not contain it.
    #[error("Address {0:#x} is not in the GSYM")]
    AddressNotFound(u64),

    #[error("Could not decode the function info at offset {offset:#x}: {source}")]
    Decode {
        offset: u64,
        #[source]
        source: DecodeError,
    },

    /// The address table and the address info offset table disagree about
    /// their length. This is only discovered during lookup.
    #[error("Address index {index} has no address info offset, the table only has {len} entries")]
    AddressInfoOffsetOutOfRange { index: usize, len: usize },
}

impl Error {
    pub fn enum_as_string(&self) -> &'static str {
        match self {
            Error::Io(_, _) => "Io",
            Error::Format(_) => "Format",
            Error::AddressNotFound(_) => "AddressNotFound",
            Error::Decode { .. } => "Decode",
            Error::AddressInfoOffsetOutOfRange { .. } => "AddressInfoOffsetOutOfRange",
        }
    }
}

/// The data is not a well-formed GSYM file. Returned when constructing a reader.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatError {
    /// The data slice was not big enough to contain one of the tables.
    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    #[error("Did not recognize magic value {0:#010x}")]
    UnrecognizedMagic(u32),

    #[error("Unsupported GSYM version {0}")]
    UnsupportedVersion(u16),

    #[error("Invalid address offset size {0}")]
    InvalidAddressOffsetSize(u8),

    #[error("Invalid UUID size {0}")]
    InvalidUuidSize(u8),

    /// Only reported by [`GsymReader::check_address_order`](crate::GsymReader::check_address_order).
    #[error("Address table entry {0} is smaller than the entry before it")]
    UnsortedAddressTable(usize),
}

/// This error indicates that the data slice was not large enough to
/// read the respective item.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    #[error("Could not read Header")]
    Header,

    #[error("Could not read AddressOffsets")]
    AddressOffsets,

    #[error("Could not read AddressInfoOffsets")]
    AddressInfoOffsets,

    #[error("Could not read FileCount")]
    FileCount,

    #[error("Could not read FileTable")]
    FileTable,

    #[error("Could not read StringTable")]
    StringTable,
}

/// The error type for [`FunctionRecordDecoder`](crate::FunctionRecordDecoder) implementations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("The record offset {0:#x} is outside the GSYM data")]
    OffsetOutOfBounds(u64),

    #[error("{offset:#x}: missing {what}")]
    Truncated { offset: u64, what: &'static str },

    #[error("Invalid function name string table offset {0:#x}")]
    InvalidName(u32),

    #[error("{offset:#x}: unsupported InfoType {info_type}")]
    UnsupportedInfoType { offset: u64, info_type: u32 },

    #[error("{0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}
