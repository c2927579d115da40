use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// The byte order of a GSYM file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    LittleEndian,
    BigEndian,
}

impl Endianness {
    /// The byte order of the machine we're running on.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Self = Endianness::LittleEndian;

    /// The byte order of the machine we're running on.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Self = Endianness::BigEndian;

    pub fn is_native(self) -> bool {
        self == Self::NATIVE
    }

    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        match self {
            Endianness::LittleEndian => LittleEndian::read_u16(bytes),
            Endianness::BigEndian => BigEndian::read_u16(bytes),
        }
    }

    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            Endianness::LittleEndian => LittleEndian::read_u32(bytes),
            Endianness::BigEndian => BigEndian::read_u32(bytes),
        }
    }

    pub fn read_u64(self, bytes: &[u8]) -> u64 {
        match self {
            Endianness::LittleEndian => LittleEndian::read_u64(bytes),
            Endianness::BigEndian => BigEndian::read_u64(bytes),
        }
    }
}

/// A fixed-size integer or record which can be stored in one of the GSYM tables.
///
/// `SIZE` bytes of a table element can always be decoded with either byte
/// order, which is what the swapped path does for every entry.
pub trait TableElement: Copy + 'static {
    const SIZE: usize;

    /// Decode one element from exactly `SIZE` bytes.
    fn decode(bytes: &[u8], endian: Endianness) -> Self;
}

impl TableElement for u8 {
    const SIZE: usize = 1;

    fn decode(bytes: &[u8], _endian: Endianness) -> Self {
        bytes[0]
    }
}

impl TableElement for u16 {
    const SIZE: usize = 2;

    fn decode(bytes: &[u8], endian: Endianness) -> Self {
        endian.read_u16(bytes)
    }
}

impl TableElement for u32 {
    const SIZE: usize = 4;

    fn decode(bytes: &[u8], endian: Endianness) -> Self {
        endian.read_u32(bytes)
    }
}

impl TableElement for u64 {
    const SIZE: usize = 8;

    fn decode(bytes: &[u8], endian: Endianness) -> Self {
        endian.read_u64(bytes)
    }
}

/// Decode every element of `bytes` into host byte order.
///
/// `bytes.len()` must be a multiple of `T::SIZE`.
pub fn decode_table<T: TableElement>(bytes: &[u8], endian: Endianness) -> Vec<T> {
    bytes
        .chunks_exact(T::SIZE)
        .map(|chunk| T::decode(chunk, endian))
        .collect()
}
