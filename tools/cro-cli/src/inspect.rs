//! Inspect command - dump structure and sample records for schema discovery
//!
//! Writes two text files into the database directory:
//!
//! - `CroStru_dump.txt`: header, hex dump of the start of the structure
//!   stream, the tagged entries that decode from it, and its cp1251 text
//! - `CroBank_sample_records.txt`: the first records of the bank stream in
//!   hex and as text
//!
//! Open them in an editor, work out column names, offsets and lengths, and
//! write them into a schema file for `cro export`.

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use cro_format::{
    BANK_FILE, CroHeader, DEFAULT_MAX_NAME_LEN, NameFormat, Plaintext, STRUCTURE_FILE, ScanLimit, TaggedFieldScanner,
    TextDecoder, scan_with,
};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::dump::{field_listing, hex_dump};
use crate::input::{read_stream, require_stream};
use crate::schema::load_schema;

/// Structure bytes shown in the hex dump
const STRUCTURE_DUMP_LEN: usize = 1024;

/// Structure dump output file
pub const STRUCTURE_DUMP_FILE: &str = "CroStru_dump.txt";

/// Bank sample output file
pub const BANK_SAMPLE_FILE: &str = "CroBank_sample_records.txt";

/// Name framing in the structure stream
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NameFormatArg {
    /// One length byte, then the name
    Byte,
    /// 16-bit little-endian length, then the name
    Word,
    /// Name ended by a NUL byte
    Cstr,
}

impl NameFormatArg {
    fn to_format(self, max_len: usize) -> NameFormat {
        match self {
            NameFormatArg::Byte => NameFormat::BytePrefixed,
            NameFormatArg::Word => NameFormat::WordPrefixed,
            NameFormatArg::Cstr => NameFormat::NullTerminated { max_len },
        }
    }
}

/// Arguments for the inspect command
#[derive(Args)]
pub struct InspectArgs {
    /// Directory containing CroBank.dat and CroStru.dat
    pub base_dir: PathBuf,

    /// How many example records to dump
    #[arg(long, default_value_t = 5)]
    pub max_records: usize,

    /// Record size in bytes when no schema is given
    #[arg(long, default_value_t = 256)]
    pub guess_record_size: usize,

    /// Schema file; its record size overrides the guess
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Offset of the first tagged entry in the structure stream
    #[arg(long, default_value_t = 0)]
    pub structure_offset: usize,

    /// Stop listing tagged entries after this many
    #[arg(long)]
    pub max_fields: Option<usize>,

    /// How entry names are framed
    #[arg(long, value_enum, default_value_t = NameFormatArg::Byte)]
    pub name_format: NameFormatArg,

    /// Longest name accepted with `--name-format cstr`
    #[arg(long, default_value_t = DEFAULT_MAX_NAME_LEN)]
    pub max_name_len: usize,
}

/// Execute the inspect command
pub fn execute(args: InspectArgs) -> Result<()> {
    if args.schema.is_none() && args.guess_record_size == 0 {
        bail!("--guess-record-size must be greater than zero");
    }

    let stru_path = require_stream(&args.base_dir, STRUCTURE_FILE)?;
    let bank_path = require_stream(&args.base_dir, BANK_FILE)?;

    let (record_size, text, data_offset) = match &args.schema {
        Some(path) => {
            let loaded = load_schema(path)?;
            let size = loaded.schema.compute_record_size()?.get();
            (size, loaded.text, loaded.data_offset)
        }
        None => (args.guess_record_size, TextDecoder::default(), 0),
    };

    let out_stru = args.base_dir.join(STRUCTURE_DUMP_FILE);
    let out_bank = args.base_dir.join(BANK_SAMPLE_FILE);

    info!(
        "Dumping structure info from {} to {}",
        stru_path.display(),
        out_stru.display()
    );
    let structure = read_stream(&stru_path, &Plaintext)?;
    let limit = args
        .max_fields
        .map_or(ScanLimit::UntilEnd, ScanLimit::Fields);
    let report = structure_report(
        &structure,
        args.structure_offset,
        limit,
        args.name_format.to_format(args.max_name_len),
        &text,
    );
    write_report(&out_stru, &report)?;

    info!(
        "Dumping sample records from {} to {}",
        bank_path.display(),
        out_bank.display()
    );
    let bank = read_stream(&bank_path, &Plaintext)?;
    let report = bank_report(&bank, data_offset, record_size, args.max_records, &text);
    write_report(&out_bank, &report)?;

    println!("Inspection files written:");
    println!("    {}", out_stru.display());
    println!("    {}", out_bank.display());
    println!("Open them in a text editor and infer fields (names, offsets, lengths),");
    println!("then write them into a schema file for `cro export`.");

    Ok(())
}

fn write_report(path: &Path, report: &str) -> Result<()> {
    std::fs::write(path, report).with_context(|| format!("Failed to write {}", path.display()))
}

/// Header, hex dump, tagged entries and full text of the structure stream
pub fn structure_report(
    data: &[u8],
    offset: usize,
    limit: ScanLimit,
    names: NameFormat,
    text: &TextDecoder,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "File size: {} bytes", data.len());
    if CroHeader::is_present(data) {
        match CroHeader::parse(data) {
            Ok(header) => {
                let _ = writeln!(
                    out,
                    "Header: version {}, encoding {}, block size {}, unknown 0x{:04X}",
                    header.version, header.encoding, header.block_size, header.unknown
                );
            }
            Err(e) => {
                let _ = writeln!(out, "Header: {}", e);
            }
        }
    }

    let len = data.len().min(STRUCTURE_DUMP_LEN);
    let _ = writeln!(out, "\n=== HEX DUMP (first {} bytes) ===\n", len);
    out.push_str(&hex_dump(&data[..len], 8));

    let _ = writeln!(out, "\n\n=== TAGGED FIELDS (from offset {}) ===\n", offset);
    let scanned = TaggedFieldScanner::with_names(data, offset, names)
        .map(|scanner| scanner.with_text_decoder(*text))
        .and_then(|scanner| scan_with(scanner, limit));
    match scanned {
        Ok(result) => {
            out.push_str(&field_listing(&result.fields, text));
            let _ = writeln!(
                out,
                "\n{} fields, stopped at offset {}",
                result.fields.len(),
                result.final_offset
            );
        }
        Err(e) => {
            warn!("Structure scan failed: {}", e);
            let _ = writeln!(out, "<scan failed: {}>", e);
        }
    }

    let _ = writeln!(
        out,
        "\n\n=== ATTEMPTED {} TEXT DECODE (entire file) ===\n",
        text.code_page.canonical_name().to_uppercase()
    );
    out.push_str(&text.decode_lossy(data));
    out
}

/// Hex and text of the first `max_records` records of the bank stream
pub fn bank_report(
    data: &[u8],
    data_offset: usize,
    record_size: usize,
    max_records: usize,
    text: &TextDecoder,
) -> String {
    let mut out = String::new();
    let body = &data[data_offset.min(data.len())..];

    let _ = writeln!(out, "File size: {} bytes", data.len());
    if data_offset > 0 {
        let _ = writeln!(out, "Skipping {} bytes before the first record", data_offset);
    }
    let _ = writeln!(
        out,
        "Using record size: {} bytes (change the schema or --guess-record-size if needed)\n",
        record_size
    );

    for (i, record) in body.chunks_exact(record_size).take(max_records).enumerate() {
        let _ = writeln!(out, "=== RECORD {} ===", i);
        out.push_str(&hex_dump(record, 4));
        let _ = writeln!(
            out,
            "\nDecoded ({}, best effort):",
            text.code_page.canonical_name()
        );
        out.push_str(&text.decode_lossy(record));
        out.push_str("\n\n");
    }
    out
}
