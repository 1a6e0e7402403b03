//! Cro-Format: decoder for Cronos database structure and bank streams
//!
//! Cronos keeps a database in a handful of `.dat` files. Once the
//! obfuscation layer has been removed (see [`StreamDecoder`]), two of them
//! carry the data this crate understands:
//!
//! - **Structure stream** (`CroStru.dat`): a catalog of named entries, each
//!   either an inline payload or a 31-bit reference. Decoded by
//!   [`TaggedFieldScanner`].
//! - **Bank stream** (`CroBank.dat`): fixed-width records. Column layout is
//!   written by hand as a [`Schema`] and decoded by the record codec
//!   ([`export`], [`Rows`]).
//!
//! Text is stored in a legacy 8-bit code page, cp1251 by default.
//!
//! # Usage
//!
//! ```ignore
//! use cro_format::{FieldSpec, Schema, TextDecoder, export};
//!
//! let bank = std::fs::read("CroBank.dat")?;
//! let schema = Schema::new(
//!     vec![FieldSpec::text("ID", 0, 4), FieldSpec::text("NAME", 4, 8)],
//!     None,
//! )?;
//! let out = export(&bank, schema.layout(TextDecoder::default())?)?;
//!
//! for warning in &out.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! for row in &out.rows {
//!     println!("{:?}", row.get("NAME"));
//! }
//! ```

mod codec;
mod cursor;
mod decoder;
mod encoding;
mod error;
mod header;
mod scanner;

pub use codec::{
    CodecWarning, ColumnKind, DecodedRow, Export, FieldSpec, RecordChunks, RecordLayout, Rows,
    Schema, compute_record_size, decode_field, decode_record, export, export_parallel,
    iterate_records,
};
pub use cursor::ByteCursor;
pub use decoder::{Plaintext, StreamDecoder};
pub use encoding::{CodePage, DecodePolicy, DecodedText, REPLACEMENT_CHAR, TextDecoder};
pub use error::CroError;
pub use header::{CRO_MAGIC, CroHeader};
pub use scanner::{
    BytePrefixedName, DEFAULT_MAX_NAME_LEN, FieldDescriptor, FieldKind, FieldValue, INLINE_FLAG,
    NameFormat, NameReader, NullTerminatedName, ScanLimit, ScanOutput, TaggedFieldScanner,
    VALUE_MASK, WordPrefixedName, scan, scan_with,
};

// =============================================================================
// File Names
// =============================================================================

/// Structure stream file inside a database directory
pub const STRUCTURE_FILE: &str = "CroStru.dat";

/// Bank stream file inside a database directory
pub const BANK_FILE: &str = "CroBank.dat";
