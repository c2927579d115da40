use crate::endian::Endianness;

/// A byte-order-aware cursor reader over a slice of GSYM data.
///
/// Every read takes an offset by mutable reference and advances it past the
/// consumed bytes on success. On failure the offset is left unchanged, so
/// that error messages can point at the missing item.
#[derive(Debug, Clone, Copy)]
pub struct DataExtractor<'data> {
    data: &'data [u8],
    endian: Endianness,
}

impl<'data> DataExtractor<'data> {
    pub fn new(data: &'data [u8], endian: Endianness) -> Self {
        Self { data, endian }
    }

    pub fn data(&self) -> &'data [u8] {
        self.data
    }

    pub fn endian(&self) -> Endianness {
        self.endian
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `size` bytes can be read at `offset`.
    pub fn is_valid_offset_for_size(&self, offset: u64, size: u64) -> bool {
        match offset.checked_add(size) {
            Some(end) => end <= self.data.len() as u64,
            None => false,
        }
    }

    /// A new extractor over the data starting at `offset`, with the same byte order.
    pub fn subextractor(&self, offset: u64) -> Option<Self> {
        let offset = usize::try_from(offset).ok()?;
        Some(Self::new(self.data.get(offset..)?, self.endian))
    }

    pub fn read_bytes(&self, offset: &mut u64, size: u64) -> Option<&'data [u8]> {
        if !self.is_valid_offset_for_size(*offset, size) {
            return None;
        }
        let start = *offset as usize;
        let bytes = &self.data[start..start + size as usize];
        *offset += size;
        Some(bytes)
    }

    pub fn read_u8(&self, offset: &mut u64) -> Option<u8> {
        self.read_bytes(offset, 1).map(|b| b[0])
    }

    pub fn read_u16(&self, offset: &mut u64) -> Option<u16> {
        let endian = self.endian;
        self.read_bytes(offset, 2).map(|b| endian.read_u16(b))
    }

    pub fn read_u32(&self, offset: &mut u64) -> Option<u32> {
        let endian = self.endian;
        self.read_bytes(offset, 4).map(|b| endian.read_u32(b))
    }

    pub fn read_u64(&self, offset: &mut u64) -> Option<u64> {
        let endian = self.endian;
        self.read_bytes(offset, 8).map(|b| endian.read_u64(b))
    }
}
