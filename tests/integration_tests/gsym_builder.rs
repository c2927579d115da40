//! A minimal GSYM encoder for tests. It writes the tables in the order the
//! reader expects: header, address offsets, address info offsets, file table,
//! string table, function infos.

use gsym_reader::{Endianness, GSYM_MAGIC, GSYM_VERSION};

pub struct Function {
    pub address_offset: u64,
    pub size: u32,
    pub name: &'static str,
    pub line_table: Option<Vec<u8>>,
}

pub struct GsymBuilder {
    pub base_address: u64,
    pub addr_off_size: u8,
    pub version: u16,
    pub uuid: Vec<u8>,
    pub functions: Vec<Function>,
    pub files: Vec<(&'static str, &'static str)>,
}

impl GsymBuilder {
    pub fn new(base_address: u64, addr_off_size: u8) -> Self {
        Self {
            base_address,
            addr_off_size,
            version: GSYM_VERSION,
            uuid: vec![0xab; 16],
            functions: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn function(mut self, address_offset: u64, size: u32, name: &'static str) -> Self {
        self.functions.push(Function {
            address_offset,
            size,
            name,
            line_table: None,
        });
        self
    }

    pub fn function_with_line_table(
        mut self,
        address_offset: u64,
        size: u32,
        name: &'static str,
        line_table: &[u8],
    ) -> Self {
        self.functions.push(Function {
            address_offset,
            size,
            name,
            line_table: Some(line_table.to_vec()),
        });
        self
    }

    pub fn file(mut self, dir: &'static str, base: &'static str) -> Self {
        self.files.push((dir, base));
        self
    }

    pub fn build(&self, endian: Endianness) -> Vec<u8> {
        let mut strtab = StringTableBuilder::default();
        let name_offsets: Vec<u32> = self.functions.iter().map(|f| strtab.add(f.name)).collect();
        let file_entries: Vec<(u32, u32)> = self
            .files
            .iter()
            .map(|(dir, base)| (strtab.add(dir), strtab.add(base)))
            .collect();

        let count = self.functions.len();
        let width = usize::from(self.addr_off_size);
        let address_offsets_start = align(48, width);
        let info_offsets_start = align(address_offsets_start + count * width, 4);
        let files_start = align(info_offsets_start + count * 4, 4);
        let strtab_start = files_start + 4 + file_entries.len() * 8;
        let records_start = align(strtab_start + strtab.bytes.len(), 4);

        let mut records = Vec::new();
        let mut info_offsets = Vec::new();
        for (function, name) in self.functions.iter().zip(&name_offsets) {
            // Each record starts 4-byte aligned.
            records.resize(align(records.len(), 4), 0);
            info_offsets.push((records_start + records.len()) as u32);
            let mut record = Vec::new();
            put_u32(&mut record, endian, function.size);
            put_u32(&mut record, endian, *name);
            if let Some(line_table) = &function.line_table {
                put_u32(&mut record, endian, 1);
                put_u32(&mut record, endian, line_table.len() as u32);
                record.extend_from_slice(line_table);
            }
            put_u32(&mut record, endian, 0);
            put_u32(&mut record, endian, 0);
            records.extend(record);
        }

        let mut out = Vec::new();
        put_u32(&mut out, endian, GSYM_MAGIC);
        put_u16(&mut out, endian, self.version);
        out.push(self.addr_off_size);
        out.push(self.uuid.len() as u8);
        put_u64(&mut out, endian, self.base_address);
        put_u32(&mut out, endian, count as u32);
        put_u32(&mut out, endian, strtab_start as u32);
        put_u32(&mut out, endian, strtab.bytes.len() as u32);
        let mut uuid = [0u8; 20];
        let uuid_len = self.uuid.len().min(20);
        uuid[..uuid_len].copy_from_slice(&self.uuid[..uuid_len]);
        out.extend_from_slice(&uuid);

        pad_to(&mut out, address_offsets_start);
        for function in &self.functions {
            let offset = function.address_offset;
            match self.addr_off_size {
                1 => out.push(offset as u8),
                2 => put_u16(&mut out, endian, offset as u16),
                4 => put_u32(&mut out, endian, offset as u32),
                _ => put_u64(&mut out, endian, offset),
            }
        }
        pad_to(&mut out, info_offsets_start);
        for info_offset in &info_offsets {
            put_u32(&mut out, endian, *info_offset);
        }
        pad_to(&mut out, files_start);
        put_u32(&mut out, endian, file_entries.len() as u32);
        for (dir, base) in &file_entries {
            put_u32(&mut out, endian, *dir);
            put_u32(&mut out, endian, *base);
        }
        assert_eq!(out.len(), strtab_start);
        out.extend_from_slice(&strtab.bytes);
        pad_to(&mut out, records_start);
        out.extend(records);
        out
    }
}

#[derive(Default)]
struct StringTableBuilder {
    bytes: Vec<u8>,
}

impl StringTableBuilder {
    fn add(&mut self, s: &str) -> u32 {
        if self.bytes.is_empty() {
            self.bytes.push(0);
        }
        let offset = self.bytes.len() as u32;
        self.bytes.extend_from_slice(s.as_bytes());
        self.bytes.push(0);
        offset
    }
}

fn align(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

fn pad_to(out: &mut Vec<u8>, len: usize) {
    assert!(out.len() <= len);
    out.resize(len, 0);
}

pub fn put_u16(out: &mut Vec<u8>, endian: Endianness, value: u16) {
    match endian {
        Endianness::LittleEndian => out.extend_from_slice(&value.to_le_bytes()),
        Endianness::BigEndian => out.extend_from_slice(&value.to_be_bytes()),
    }
}

pub fn put_u32(out: &mut Vec<u8>, endian: Endianness, value: u32) {
    match endian {
        Endianness::LittleEndian => out.extend_from_slice(&value.to_le_bytes()),
        Endianness::BigEndian => out.extend_from_slice(&value.to_be_bytes()),
    }
}

pub fn put_u64(out: &mut Vec<u8>, endian: Endianness, value: u64) {
    match endian {
        Endianness::LittleEndian => out.extend_from_slice(&value.to_le_bytes()),
        Endianness::BigEndian => out.extend_from_slice(&value.to_be_bytes()),
    }
}
