use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gsym_reader::{Error, GsymReader};

#[derive(Debug, Parser)]
#[command(
    name = "gsym-lookup",
    about = "Look up addresses in a GSYM file and print the functions containing them."
)]
struct Opt {
    /// Path to the GSYM file
    gsym_path: PathBuf,

    /// Addresses to look up, in hex. Read from stdin, one per line, if none are given.
    #[arg(value_parser = parse_hex_address)]
    addresses: Vec<u64>,

    /// Check that the address table is sorted before doing any lookups.
    #[arg(long)]
    verify: bool,

    /// Print the header and every function in the file.
    #[arg(long)]
    dump: bool,
}

fn parse_hex_address(s: &str) -> Result<u64, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(digits, 16).map_err(|e| format!("invalid address {s:?}: {e}"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::parse();

    let reader = GsymReader::open(&opt.gsym_path)?;
    log::info!(
        "Opened {} ({:?}, {} addresses, {} files)",
        opt.gsym_path.display(),
        reader.endian(),
        reader.num_addresses(),
        reader.num_files()
    );

    if opt.verify {
        reader
            .check_address_order()
            .with_context(|| format!("Verifying {}", opt.gsym_path.display()))?;
    }

    if opt.dump {
        dump(&reader);
    }

    if !opt.addresses.is_empty() {
        for address in &opt.addresses {
            print_lookup(&reader, *address);
        }
    } else if !opt.dump {
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_hex_address(line) {
                Ok(address) => print_lookup(&reader, address),
                Err(e) => eprintln!("{e}"),
            }
        }
    }
    Ok(())
}

fn print_lookup(reader: &GsymReader, address: u64) {
    match reader.lookup(address) {
        Ok(info) => {
            let name = reader.function_name(&info).unwrap_or("<invalid name>");
            println!(
                "{address:#x}: {name} [{:#x}, {:#x})",
                info.range.start, info.range.end
            );
        }
        Err(Error::AddressNotFound(_)) => println!("{address:#x}: ??"),
        Err(e) => {
            log::warn!("Lookup failed: {e}");
            println!("{address:#x}: <error: {}>", e.enum_as_string());
        }
    }
}

fn dump(reader: &GsymReader) {
    let header = reader.header();
    println!("Header:");
    println!("  Magic        = {:#010x}", header.magic);
    println!("  Version      = {:#06x}", header.version);
    println!("  AddrOffSize  = {:#04x}", header.addr_off_size);
    println!("  UUIDSize     = {:#04x}", header.uuid_size);
    println!("  BaseAddress  = {:#018x}", header.base_address);
    println!("  NumAddresses = {:#010x}", header.num_addresses);
    println!("  StrtabOffset = {:#010x}", header.strtab_offset);
    println!("  StrtabSize   = {:#010x}", header.strtab_size);
    let uuid: String = reader.uuid().iter().map(|b| format!("{b:02X}")).collect();
    println!("  UUID         = {uuid}");
    println!("  ByteOrder    = {:?}", reader.endian());
    println!();

    println!("Files:");
    for index in 0..reader.num_files() as u32 {
        if let Some(file) = reader.file_at(index) {
            let dir = reader.string_at(file.dir).unwrap_or("");
            let base = reader.string_at(file.base).unwrap_or("");
            println!("  [{index:4}] {dir}/{base}");
        }
    }
    println!();

    println!("Functions:");
    for index in 0..reader.num_addresses() {
        match reader.decode_record_at(index, &gsym_reader::FunctionInfoDecoder) {
            Ok(info) => {
                let name = reader.function_name(&info).unwrap_or("<invalid name>");
                let mut extras = Vec::new();
                if let Some(line_table) = info.line_table {
                    extras.push(format!("line table: {} bytes", line_table.len()));
                }
                if let Some(inline_info) = info.inline_info {
                    extras.push(format!("inline info: {} bytes", inline_info.len()));
                }
                println!(
                    "  [{index:6}] [{:#x}, {:#x}) {name} {}",
                    info.range.start,
                    info.range.end,
                    extras.join(", ")
                );
            }
            Err(e) => println!("  [{index:6}] <error: {e}>"),
        }
    }
}
