//! Tagged field scanner for the structure stream
//!
//! Each entry in the structure stream is a name followed by a 32-bit
//! little-endian control word. Bit 31 of the control word is the only
//! self-description the format carries:
//!
//! - set: the low 31 bits are a byte count and that many payload bytes follow
//!   inline
//! - clear: the low 31 bits are the value itself (an index into another
//!   structure) and nothing follows
//!
//! There is no entry count and no end marker. A misread size shifts every
//! following entry, so short reads are always errors.

mod name;

use tracing::debug;

use crate::cursor::ByteCursor;
use crate::encoding::TextDecoder;
use crate::error::CroError;

pub use name::{
    BytePrefixedName, DEFAULT_MAX_NAME_LEN, NameFormat, NameReader, NullTerminatedName,
    WordPrefixedName,
};

/// Discriminator bit in the control word
pub const INLINE_FLAG: u32 = 0x8000_0000;

/// Mask for the size (inline) or value (reference) carried in the control word
pub const VALUE_MASK: u32 = 0x7FFF_FFFF;

/// Kind of a decoded field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Inline,
    Reference,
}

/// Value carried by a structure entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Payload stored in the stream
    Inline(Vec<u8>),
    /// 31-bit value pointing elsewhere; not resolved here
    Reference(u32),
}

impl FieldValue {
    /// Split a control word into its kind and 31-bit value
    fn split_control_word(word: u32) -> (FieldKind, u32) {
        let kind = if word >> 31 == 1 {
            FieldKind::Inline
        } else {
            FieldKind::Reference
        };
        (kind, word & VALUE_MASK)
    }
}

/// One decoded structure entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Name decoded with the scanner's code page
    pub name: String,
    /// Name bytes exactly as stored
    pub raw_name: Vec<u8>,
    /// Offset of the entry's first byte in the buffer
    pub offset: usize,
    pub value: FieldValue,
}

impl FieldDescriptor {
    pub fn kind(&self) -> FieldKind {
        match self.value {
            FieldValue::Inline(_) => FieldKind::Inline,
            FieldValue::Reference(_) => FieldKind::Reference,
        }
    }

    /// Inline payload size, or `None` for references
    pub fn size(&self) -> Option<usize> {
        match &self.value {
            FieldValue::Inline(payload) => Some(payload.len()),
            FieldValue::Reference(_) => None,
        }
    }
}

/// How many entries a scan should decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanLimit {
    /// Stop after this many entries (or earlier at the end of the buffer)
    Fields(usize),
    /// Stop when the cursor reaches the end of the buffer
    UntilEnd,
}

/// Result of [`scan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutput {
    pub fields: Vec<FieldDescriptor>,
    /// Offset just past the last decoded entry
    pub final_offset: usize,
}

/// Walks a structure stream one entry at a time
pub struct TaggedFieldScanner<'a, N: NameReader = BytePrefixedName> {
    cursor: ByteCursor<'a>,
    names: N,
    text: TextDecoder,
    /// Set once the iterator has yielded an error
    failed: bool,
}

impl<'a> TaggedFieldScanner<'a, BytePrefixedName> {
    /// Scanner with byte-prefixed names and cp1251 text, starting at `offset`
    pub fn new(data: &'a [u8], offset: usize) -> Result<Self, CroError> {
        Self::with_names(data, offset, BytePrefixedName)
    }
}

impl<'a, N: NameReader> TaggedFieldScanner<'a, N> {
    pub fn with_names(data: &'a [u8], offset: usize, names: N) -> Result<Self, CroError> {
        Ok(Self {
            cursor: ByteCursor::at(data, offset)?,
            names,
            text: TextDecoder::default(),
            failed: false,
        })
    }

    /// Use a different code page for names
    pub fn with_text_decoder(mut self, text: TextDecoder) -> Self {
        self.text = text;
        self
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Decode the next entry.
    ///
    /// Returns `Ok(None)` when the cursor is exactly at the end of the buffer.
    /// On error the scanner position is left at the start of the failed entry.
    pub fn next_field(&mut self) -> Result<Option<FieldDescriptor>, CroError> {
        if self.cursor.is_at_end() {
            return Ok(None);
        }

        // Work on a copy so a failed entry leaves no partial progress
        let mut cursor = self.cursor;
        let offset = cursor.position();

        let raw_name = self.names.read_name(&mut cursor)?;
        let name = self.text.decode_lossy(raw_name);

        let (kind, value) = FieldValue::split_control_word(cursor.read_u32()?);
        let value = match kind {
            FieldKind::Inline => FieldValue::Inline(cursor.read_bytes(value as usize)?.to_vec()),
            FieldKind::Reference => FieldValue::Reference(value),
        };

        self.cursor = cursor;
        Ok(Some(FieldDescriptor {
            name,
            raw_name: raw_name.to_vec(),
            offset,
            value,
        }))
    }
}

/// Yields entries until the end of the buffer. The first error ends
/// iteration; the scanner still reports the failed entry's position.
impl<N: NameReader> Iterator for TaggedFieldScanner<'_, N> {
    type Item = Result<FieldDescriptor, CroError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.next_field().transpose();
        if matches!(result, Some(Err(_))) {
            self.failed = true;
        }
        result
    }
}

/// Decode entries from `data` starting at `offset` with byte-prefixed names
pub fn scan(data: &[u8], offset: usize, limit: ScanLimit) -> Result<ScanOutput, CroError> {
    scan_with(TaggedFieldScanner::new(data, offset)?, limit)
}

/// Decode entries with an already configured scanner
pub fn scan_with<N: NameReader>(
    mut scanner: TaggedFieldScanner<'_, N>,
    limit: ScanLimit,
) -> Result<ScanOutput, CroError> {
    let max = match limit {
        ScanLimit::Fields(n) => n,
        ScanLimit::UntilEnd => usize::MAX,
    };

    let mut fields = Vec::new();
    while fields.len() < max {
        match scanner.next_field()? {
            Some(field) => fields.push(field),
            None => break,
        }
    }

    debug!(
        "Scanned {} structure fields, ending at offset {}",
        fields.len(),
        scanner.position()
    );

    Ok(ScanOutput {
        fields,
        final_offset: scanner.position(),
    })
}
