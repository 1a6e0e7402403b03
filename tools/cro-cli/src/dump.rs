//! Hex and text dumps used by `cro inspect`

use cro_format::{FieldDescriptor, FieldValue, TextDecoder};
use std::fmt::Write;

/// Bytes per dump line
const LINE_WIDTH: usize = 16;

/// Classic 16-bytes-per-line dump: offset, hex bytes, printable ASCII.
///
/// `offset_digits` is 8 for whole files and 4 for single records.
pub fn hex_dump(data: &[u8], offset_digits: usize) -> String {
    let mut out = String::new();
    for (i, line) in data.chunks(LINE_WIDTH).enumerate() {
        let hex_part = line
            .iter()
            .map(|b| hex::encode_upper([*b]))
            .collect::<Vec<_>>()
            .join(" ");
        let ascii_part: String = line
            .iter()
            .map(|&b| {
                if (32..127).contains(&b) {
                    b as char
                } else {
                    '.'
                }
            })
            .collect();
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{:0width$X}  {:<48}  {}",
            i * LINE_WIDTH,
            hex_part,
            ascii_part,
            width = offset_digits
        );
    }
    out
}

/// One line per structure entry
pub fn field_listing(fields: &[FieldDescriptor], text: &TextDecoder) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        let name = field.name.escape_debug().to_string();
        let _ = match &field.value {
            FieldValue::Inline(payload) => {
                let preview = &payload[..payload.len().min(LINE_WIDTH)];
                writeln!(
                    out,
                    "{:4}  @{:08X}  {:<24} inline {:>8}  {}  {:?}",
                    i,
                    field.offset,
                    name,
                    payload.len(),
                    hex::encode_upper(preview),
                    text.decode_lossy(preview)
                )
            }
            FieldValue::Reference(value) => writeln!(
                out,
                "{:4}  @{:08X}  {:<24} ref    {:>8}",
                i, field.offset, name, value
            ),
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_dump_line_layout() {
        let data: Vec<u8> = (0x41..0x41 + 18).collect();
        let dump = hex_dump(&data, 8);
        let lines: Vec<&str> = dump.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("00000000  41 42 43"));
        assert!(lines[0].ends_with("ABCDEFGHIJKLMNOP"));
        assert!(lines[1].starts_with("00000010  51 52 "));
        assert!(lines[1].ends_with("  QR"));
    }

    #[test]
    fn test_hex_dump_non_printable() {
        let dump = hex_dump(&[0x00, 0x7F, 0xC0, b'a'], 4);
        assert!(dump.starts_with("0000  00 7F C0 61"));
        assert!(dump.trim_end().ends_with("...a"));
    }

    #[test]
    fn test_field_listing() {
        let fields = vec![
            FieldDescriptor {
                name: "Bank".to_string(),
                raw_name: b"Bank".to_vec(),
                offset: 0,
                value: FieldValue::Inline(b"\x01\x02".to_vec()),
            },
            FieldDescriptor {
                name: "BankId".to_string(),
                raw_name: b"BankId".to_vec(),
                offset: 11,
                value: FieldValue::Reference(7),
            },
        ];
        let listing = field_listing(&fields, &TextDecoder::default());
        let lines: Vec<&str> = listing.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Bank"));
        assert!(lines[0].contains("inline"));
        assert!(lines[0].contains("0102"));
        assert!(lines[1].contains("@0000000B"));
        assert!(lines[1].contains("ref"));
        assert!(lines[1].trim_end().ends_with('7'));
    }
}
