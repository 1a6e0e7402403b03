//! Field name encodings
//!
//! The structure stream does not describe how names are framed, so the
//! framing is a strategy chosen by the caller.

use crate::cursor::ByteCursor;
use crate::error::CroError;

/// Default longest name, terminator excluded, for [`NullTerminatedName`]
pub const DEFAULT_MAX_NAME_LEN: usize = 255;

/// Reads the raw bytes of one field name from the cursor
pub trait NameReader {
    fn read_name<'a>(&self, cursor: &mut ByteCursor<'a>) -> Result<&'a [u8], CroError>;
}

/// One length byte followed by the name bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct BytePrefixedName;

impl NameReader for BytePrefixedName {
    fn read_name<'a>(&self, cursor: &mut ByteCursor<'a>) -> Result<&'a [u8], CroError> {
        let len = cursor.read_u8()? as usize;
        cursor.read_bytes(len)
    }
}

/// 16-bit little-endian length followed by the name bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct WordPrefixedName;

impl NameReader for WordPrefixedName {
    fn read_name<'a>(&self, cursor: &mut ByteCursor<'a>) -> Result<&'a [u8], CroError> {
        let len = cursor.read_u16()? as usize;
        cursor.read_bytes(len)
    }
}

/// Name bytes ended by `0x00`; the terminator is consumed
#[derive(Debug, Clone, Copy)]
pub struct NullTerminatedName {
    /// Longest accepted name, not counting the terminator
    pub max_len: usize,
}

impl Default for NullTerminatedName {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl NameReader for NullTerminatedName {
    fn read_name<'a>(&self, cursor: &mut ByteCursor<'a>) -> Result<&'a [u8], CroError> {
        cursor.read_until_nul(self.max_len)
    }
}

/// Runtime-selectable name framing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameFormat {
    #[default]
    BytePrefixed,
    WordPrefixed,
    NullTerminated { max_len: usize },
}

impl NameFormat {
    /// NUL-terminated names with the default length limit
    pub fn null_terminated() -> Self {
        NameFormat::NullTerminated {
            max_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl NameReader for NameFormat {
    fn read_name<'a>(&self, cursor: &mut ByteCursor<'a>) -> Result<&'a [u8], CroError> {
        match self {
            NameFormat::BytePrefixed => BytePrefixedName.read_name(cursor),
            NameFormat::WordPrefixed => WordPrefixedName.read_name(cursor),
            NameFormat::NullTerminated { max_len } => {
                NullTerminatedName { max_len: *max_len }.read_name(cursor)
            }
        }
    }
}
