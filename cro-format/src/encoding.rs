//! Legacy 8-bit text decoding
//!
//! Cronos stores text in the Windows code page of the machine that created
//! the bank, which for the databases this crate targets is cp1251 (Cyrillic).
//! Latin-1 and plain ASCII are available for other captures.

use crate::error::CroError;

/// Character substituted for unmapped bytes under [`DecodePolicy::Replace`]
pub const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// Supported 8-bit code pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodePage {
    #[default]
    Cp1251,
    Latin1,
    Ascii,
}

impl CodePage {
    pub fn canonical_name(self) -> &'static str {
        match self {
            CodePage::Cp1251 => "cp1251",
            CodePage::Latin1 => "latin1",
            CodePage::Ascii => "ascii",
        }
    }

    /// Resolve a code page from a user-supplied name (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self, CroError> {
        match name.to_ascii_lowercase().as_str() {
            "cp1251" | "windows-1251" | "win1251" => Ok(CodePage::Cp1251),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(CodePage::Latin1),
            "ascii" | "us-ascii" => Ok(CodePage::Ascii),
            _ => Err(CroError::UnknownEncoding(name.to_string())),
        }
    }

    /// Map a single byte, `None` if the code page leaves it unassigned
    pub fn decode_byte(self, byte: u8) -> Option<char> {
        if byte < 0x80 {
            return Some(byte as char);
        }
        match self {
            CodePage::Latin1 => Some(byte as char),
            CodePage::Ascii => None,
            CodePage::Cp1251 => cp1251_high(byte),
        }
    }
}

/// What to do with bytes the code page does not map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Substitute [`REPLACEMENT_CHAR`]
    #[default]
    Replace,
    /// Drop the byte
    Skip,
    /// Fail with [`CroError::UndecodableByte`]
    Strict,
}

impl DecodePolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "replace" => Some(DecodePolicy::Replace),
            "skip" => Some(DecodePolicy::Skip),
            "strict" => Some(DecodePolicy::Strict),
            _ => None,
        }
    }
}

/// Decoded text plus the number of bytes that were replaced or skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub replaced: usize,
}

/// Code page paired with a decode policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextDecoder {
    pub code_page: CodePage,
    pub policy: DecodePolicy,
}

impl TextDecoder {
    pub fn new(code_page: CodePage, policy: DecodePolicy) -> Self {
        Self { code_page, policy }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedText, CroError> {
        let mut text = String::with_capacity(bytes.len());
        let mut replaced = 0;

        for (offset, &byte) in bytes.iter().enumerate() {
            match self.code_page.decode_byte(byte) {
                Some(ch) => text.push(ch),
                None => match self.policy {
                    DecodePolicy::Replace => {
                        text.push(REPLACEMENT_CHAR);
                        replaced += 1;
                    }
                    DecodePolicy::Skip => replaced += 1,
                    DecodePolicy::Strict => {
                        return Err(CroError::UndecodableByte { byte, offset });
                    }
                },
            }
        }

        Ok(DecodedText { text, replaced })
    }

    /// Decode, replacing unmapped bytes regardless of the configured policy
    pub fn decode_lossy(&self, bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|&b| self.code_page.decode_byte(b).unwrap_or(REPLACEMENT_CHAR))
            .collect()
    }
}

/// cp1251 bytes 0x80..=0xBF; 0 marks the single unassigned slot (0x98)
const CP1251_80_BF: [u16; 64] = [
    0x0402, 0x0403, 0x201A, 0x0453, 0x201E, 0x2026, 0x2020, 0x2021, // 80
    0x20AC, 0x2030, 0x0409, 0x2039, 0x040A, 0x040C, 0x040B, 0x040F, // 88
    0x0452, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, // 90
    0x0000, 0x2122, 0x0459, 0x203A, 0x045A, 0x045C, 0x045B, 0x045F, // 98
    0x00A0, 0x040E, 0x045E, 0x0408, 0x00A4, 0x0490, 0x00A6, 0x00A7, // A0
    0x0401, 0x00A9, 0x0404, 0x00AB, 0x00AC, 0x00AD, 0x00AE, 0x0407, // A8
    0x00B0, 0x00B1, 0x0406, 0x0456, 0x0491, 0x00B5, 0x00B6, 0x00B7, // B0
    0x0451, 0x2116, 0x0454, 0x00BB, 0x0458, 0x0405, 0x0455, 0x0457, // B8
];

fn cp1251_high(byte: u8) -> Option<char> {
    match byte {
        // А..я are contiguous
        0xC0..=0xFF => char::from_u32(0x0410 + (byte - 0xC0) as u32),
        0x80..=0xBF => match CP1251_80_BF[(byte - 0x80) as usize] {
            0 => None,
            cp => char::from_u32(cp as u32),
        },
        _ => Some(byte as char),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cp1251_cyrillic() {
        let decoder = TextDecoder::default();
        // "Иванов" in cp1251
        let bytes = [0xC8, 0xE2, 0xE0, 0xED, 0xEE, 0xE2];
        assert_eq!(decoder.decode(&bytes).unwrap().text, "Иванов");
        assert_eq!(CodePage::Cp1251.decode_byte(0xC0), Some('А'));
        assert_eq!(CodePage::Cp1251.decode_byte(0xFF), Some('я'));
        assert_eq!(CodePage::Cp1251.decode_byte(0xA8), Some('Ё'));
        assert_eq!(CodePage::Cp1251.decode_byte(0xB8), Some('ё'));
        assert_eq!(CodePage::Cp1251.decode_byte(0xB9), Some('№'));
    }

    #[test]
    fn test_unassigned_byte_policies() {
        let bytes = b"A\x98B";

        let replace = TextDecoder::new(CodePage::Cp1251, DecodePolicy::Replace);
        let decoded = replace.decode(bytes).unwrap();
        assert_eq!(decoded.text, "A\u{FFFD}B");
        assert_eq!(decoded.replaced, 1);

        let skip = TextDecoder::new(CodePage::Cp1251, DecodePolicy::Skip);
        let decoded = skip.decode(bytes).unwrap();
        assert_eq!(decoded.text, "AB");
        assert_eq!(decoded.replaced, 1);

        let strict = TextDecoder::new(CodePage::Cp1251, DecodePolicy::Strict);
        assert_eq!(
            strict.decode(bytes),
            Err(CroError::UndecodableByte {
                byte: 0x98,
                offset: 1
            })
        );
    }

    #[test]
    fn test_ascii_and_latin1() {
        let ascii = TextDecoder::new(CodePage::Ascii, DecodePolicy::Replace);
        assert_eq!(ascii.decode(b"ok\xE9").unwrap().replaced, 1);

        let latin1 = TextDecoder::new(CodePage::Latin1, DecodePolicy::Strict);
        assert_eq!(latin1.decode(b"caf\xE9").unwrap().text, "café");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(CodePage::from_name("CP1251").unwrap(), CodePage::Cp1251);
        assert_eq!(CodePage::from_name("windows-1251").unwrap(), CodePage::Cp1251);
        assert_eq!(CodePage::from_name("iso-8859-1").unwrap(), CodePage::Latin1);
        assert!(matches!(
            CodePage::from_name("koi8-r"),
            Err(CroError::UnknownEncoding(_))
        ));
        assert_eq!(DecodePolicy::from_name("Strict"), Some(DecodePolicy::Strict));
        assert_eq!(DecodePolicy::from_name("ignore"), None);
    }
}
