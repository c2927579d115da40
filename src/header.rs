use zerocopy_derive::{FromBytes, Immutable, KnownLayout};

use crate::data_extractor::DataExtractor;
use crate::endian::Endianness;
use crate::error::{FormatError, ReadError};

/// "GSYM" when read in the file's byte order.
pub const GSYM_MAGIC: u32 = 0x4753_594d;
/// The magic value as seen when the file's byte order is the opposite of ours.
pub const GSYM_CIGAM: u32 = 0x4d59_5347;
pub const GSYM_VERSION: u16 = 1;
pub const GSYM_MAX_UUID_SIZE: usize = 20;

/// The fixed-layout header at the start of every GSYM file.
///
/// The layout matches the file byte for byte, so a natively ordered file's
/// header can be used in place. All values are in host byte order once the
/// header is reachable through a [`GsymReader`](crate::GsymReader).
#[derive(FromBytes, KnownLayout, Immutable, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Header {
    /// Always [`GSYM_MAGIC`].
    pub magic: u32,
    pub version: u16,
    /// The byte size of each entry in the address table: 1, 2, 4 or 8.
    pub addr_off_size: u8,
    /// The number of meaningful bytes in `uuid`.
    pub uuid_size: u8,
    /// All addresses in the address table are offsets from this address.
    pub base_address: u64,
    pub num_addresses: u32,
    /// Absolute file offset of the string table.
    pub strtab_offset: u32,
    pub strtab_size: u32,
    pub uuid: [u8; GSYM_MAX_UUID_SIZE],
}

impl Header {
    pub const SIZE: usize = std::mem::size_of::<Header>();

    /// Detect the file's byte order from the magic value at the start of `data`.
    pub fn detect_endian(data: &[u8]) -> Result<Endianness, FormatError> {
        let magic: [u8; 4] = data
            .get(..4)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(ReadError::Header)?;
        if u32::from_le_bytes(magic) == GSYM_MAGIC {
            Ok(Endianness::LittleEndian)
        } else if u32::from_be_bytes(magic) == GSYM_MAGIC {
            Ok(Endianness::BigEndian)
        } else {
            Err(FormatError::UnrecognizedMagic(u32::from_ne_bytes(magic)))
        }
    }

    /// Decode the header field by field, in the given byte order.
    pub fn decode(data: &[u8], endian: Endianness) -> Result<Self, FormatError> {
        let extractor = DataExtractor::new(data, endian);
        if !extractor.is_valid_offset_for_size(0, Self::SIZE as u64) {
            return Err(ReadError::Header.into());
        }
        let mut offset = 0;
        let mut next = || -> Option<Header> {
            let magic = extractor.read_u32(&mut offset)?;
            let version = extractor.read_u16(&mut offset)?;
            let addr_off_size = extractor.read_u8(&mut offset)?;
            let uuid_size = extractor.read_u8(&mut offset)?;
            let base_address = extractor.read_u64(&mut offset)?;
            let num_addresses = extractor.read_u32(&mut offset)?;
            let strtab_offset = extractor.read_u32(&mut offset)?;
            let strtab_size = extractor.read_u32(&mut offset)?;
            let uuid = extractor
                .read_bytes(&mut offset, GSYM_MAX_UUID_SIZE as u64)?
                .try_into()
                .ok()?;
            Some(Header {
                magic,
                version,
                addr_off_size,
                uuid_size,
                base_address,
                num_addresses,
                strtab_offset,
                strtab_size,
                uuid,
            })
        };
        next().ok_or(FormatError::Read(ReadError::Header))
    }

    /// Check the values which the rest of the file layout depends on.
    pub fn check_for_error(&self) -> Result<(), FormatError> {
        if self.magic != GSYM_MAGIC {
            return Err(FormatError::UnrecognizedMagic(self.magic));
        }
        if self.version != GSYM_VERSION {
            return Err(FormatError::UnsupportedVersion(self.version));
        }
        AddressOffsetSize::from_byte_size(self.addr_off_size)?;
        if usize::from(self.uuid_size) > GSYM_MAX_UUID_SIZE {
            return Err(FormatError::InvalidUuidSize(self.uuid_size));
        }
        Ok(())
    }

    pub fn address_offset_size(&self) -> Result<AddressOffsetSize, FormatError> {
        AddressOffsetSize::from_byte_size(self.addr_off_size)
    }

    /// The meaningful part of the UUID.
    pub fn uuid(&self) -> &[u8] {
        let len = usize::from(self.uuid_size).min(GSYM_MAX_UUID_SIZE);
        &self.uuid[..len]
    }
}

/// The width of the entries in the address table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressOffsetSize {
    U8,
    U16,
    U32,
    U64,
}

impl AddressOffsetSize {
    pub fn from_byte_size(size: u8) -> Result<Self, FormatError> {
        match size {
            1 => Ok(Self::U8),
            2 => Ok(Self::U16),
            4 => Ok(Self::U32),
            8 => Ok(Self::U64),
            other => Err(FormatError::InvalidAddressOffsetSize(other)),
        }
    }

    pub fn byte_size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }
}
