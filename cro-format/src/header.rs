//! Cronos `.dat` file header
//!
//! Layout (19 bytes, little-endian):
//!
//! | Offset | Size | Field |
//! |---|---|---|
//! | 0 | 8 | magic `"CroFile\0"` |
//! | 8 | 2 | unknown |
//! | 10 | 5 | version, ASCII (e.g. `01.03`) |
//! | 15 | 2 | encoding flags |
//! | 17 | 2 | block size |

use crate::cursor::ByteCursor;
use crate::error::CroError;

/// Header magic string
pub const CRO_MAGIC: &[u8; 8] = b"CroFile\0";

/// Parsed file header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroHeader {
    pub unknown: u16,
    pub version: String,
    pub encoding: u16,
    pub block_size: u16,
}

impl CroHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = 19;

    pub fn parse(data: &[u8]) -> Result<Self, CroError> {
        let mut cursor = ByteCursor::new(data);

        if cursor.read_bytes(CRO_MAGIC.len())? != CRO_MAGIC {
            return Err(CroError::InvalidMagic);
        }

        let unknown = cursor.read_u16()?;
        let version = String::from_utf8_lossy(cursor.read_bytes(5)?)
            .trim_end_matches('\0')
            .to_string();
        let encoding = cursor.read_u16()?;
        let block_size = cursor.read_u16()?;

        Ok(Self {
            unknown,
            version,
            encoding,
            block_size,
        })
    }

    /// Cheap check for the magic without parsing the rest
    pub fn is_present(data: &[u8]) -> bool {
        data.starts_with(CRO_MAGIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Vec<u8> {
        let mut data = CRO_MAGIC.to_vec();
        data.extend_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(b"01.03");
        data.extend_from_slice(&3u16.to_le_bytes());
        data.extend_from_slice(&0x40u16.to_le_bytes());
        data
    }

    #[test]
    fn test_parse_header() {
        let data = sample_header();
        assert_eq!(data.len(), CroHeader::SIZE);

        let header = CroHeader::parse(&data).unwrap();
        assert_eq!(header.unknown, 2);
        assert_eq!(header.version, "01.03");
        assert_eq!(header.encoding, 3);
        assert_eq!(header.block_size, 0x40);
        assert!(CroHeader::is_present(&data));
    }

    #[test]
    fn test_parse_invalid_magic() {
        let mut data = sample_header();
        data[0] = b'X';
        assert_eq!(CroHeader::parse(&data), Err(CroError::InvalidMagic));
        assert!(!CroHeader::is_present(&data));
    }

    #[test]
    fn test_parse_too_small() {
        let data = sample_header();
        assert!(matches!(
            CroHeader::parse(&data[..CroHeader::SIZE - 1]),
            Err(CroError::TruncatedStream { .. })
        ));
        assert!(matches!(
            CroHeader::parse(b"Cro"),
            Err(CroError::TruncatedStream { .. })
        ));
    }
}
