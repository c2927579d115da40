//! This crate reads GSYM files, a compact symbol table format which maps
//! addresses in a compiled binary to function information (name, line table,
//! inline frames) without needing the original debug information.
//!
//! GSYM files are designed to be mapped into memory and queried without any
//! upfront parsing. If the file's byte order matches the byte order of the
//! machine, the header and all tables are used in place. Otherwise they are
//! decoded into host-endian copies once, when the reader is created.
//!
//! The main entry point is [`GsymReader`]:
//!
//! ```no_run
//! use gsym_reader::GsymReader;
//!
//! # fn main() -> Result<(), gsym_reader::Error> {
//! let reader = GsymReader::open("libxul.so.gsym")?;
//! let info = reader.lookup(0x12345)?;
//! println!(
//!     "{:#x}: {} ({:#x}..{:#x})",
//!     0x12345,
//!     reader.function_name(&info).unwrap_or("<unknown>"),
//!     info.range.start,
//!     info.range.end
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Lookups
//!
//! A lookup subtracts the header's base address, binary searches the address
//! table for the last entry at or before the address, and decodes the
//! function info record that the matching entry points to. Decoding is done
//! by a [`FunctionRecordDecoder`]; [`GsymReader::lookup`] uses the built-in
//! [`FunctionInfoDecoder`], and [`GsymReader::lookup_with`] accepts any other.
//!
//! The reader is immutable after construction and is `Send + Sync`, so it can
//! be shared between threads without locking.

mod address_table;
mod byte_source;
mod data_extractor;
mod endian;
mod error;
mod function_info;
mod gsym_reader;
mod header;
mod reader;
mod string_table;
mod tables;

pub use address_table::AddressOffsets;
pub use byte_source::ByteSource;
pub use data_extractor::DataExtractor;
pub use endian::Endianness;
pub use error::{DecodeError, Error, FormatError, ReadError};
pub use function_info::{FunctionInfo, FunctionInfoDecoder, FunctionRecordDecoder, InfoType};
pub use gsym_reader::GsymReader;
pub use header::{
    AddressOffsetSize, Header, GSYM_CIGAM, GSYM_MAGIC, GSYM_MAX_UUID_SIZE, GSYM_VERSION,
};
pub use string_table::{FileEntry, StringTable};
