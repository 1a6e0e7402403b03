//! Error types for structure scanning and bank decoding

use thiserror::Error;

/// Errors that can occur when decoding Cronos streams
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CroError {
    /// A read needed more bytes than remain in the buffer
    #[error("Truncated stream at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedStream {
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// Schema declares no fields and no explicit record size
    #[error("Schema has no fields and no explicit record size")]
    EmptySchema,
    /// Two fields share a name
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),
    /// Field declared with a length of zero
    #[error("Field '{0}' has zero length")]
    ZeroLengthField(String),
    /// Field lengths add up to more than `usize` can hold
    #[error("Sum of field lengths overflows the record size")]
    RecordSizeOverflow,
    /// Explicit record size override of zero
    #[error("Record size must be greater than zero")]
    ZeroRecordSize,
    /// Byte not mapped by the code page (strict policy only)
    #[error("Undecodable byte 0x{byte:02X} at offset {offset}")]
    UndecodableByte { byte: u8, offset: usize },
    /// Code page name not recognised
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),
    /// File header magic mismatch
    #[error("Invalid magic bytes (expected 'CroFile')")]
    InvalidMagic,
}

impl CroError {
    pub(crate) fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::TruncatedStream {
            offset,
            needed,
            available,
        }
    }
}
