use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use crate::error::Error;

/// The bytes a [`GsymReader`](crate::GsymReader) reads from: either a
/// read-only mapping of a file, or a buffer owned by the reader.
pub enum ByteSource {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl ByteSource {
    /// Map the file at `path` into memory.
    pub fn map_file(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::Io(path.to_owned(), e))?;
        // SAFETY: The mapping is read-only. Modifying the file while it is
        // mapped is outside of what we can guard against.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::Io(path.to_owned(), e))?;
        Ok(ByteSource::Mapped(mmap))
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            ByteSource::Mapped(mmap) => &mmap[..],
            ByteSource::Owned(bytes) => &bytes[..],
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, ByteSource::Mapped(_))
    }
}

impl Deref for ByteSource {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteSource::Mapped(mmap) => write!(f, "ByteSource::Mapped({} bytes)", mmap.len()),
            ByteSource::Owned(bytes) => write!(f, "ByteSource::Owned({} bytes)", bytes.len()),
        }
    }
}
