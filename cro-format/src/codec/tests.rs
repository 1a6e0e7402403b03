//! Tests for the fixed-width record codec

use std::num::NonZeroUsize;

use super::*;
use crate::encoding::{CodePage, DecodePolicy};

fn size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn people_schema() -> Schema {
    Schema::new(
        vec![FieldSpec::text("ID", 0, 4), FieldSpec::text("NAME", 4, 8)],
        None,
    )
    .unwrap()
}

fn people_bank() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"0001");
    data.extend_from_slice(b"ALICE\0\0\0");
    data.extend_from_slice(b"0002");
    data.extend_from_slice(b"BOB\0\0\0\0\0");
    data
}

#[test]
fn test_record_size_is_sum_of_lengths() {
    let schema = people_schema();
    assert_eq!(schema.compute_record_size().unwrap().get(), 12);
    assert_eq!(
        compute_record_size(&schema).unwrap(),
        schema.compute_record_size().unwrap()
    );
}

#[test]
fn test_record_size_tracks_length_change() {
    let old = people_schema();
    let old_size = old.compute_record_size().unwrap().get();

    let mut fields = old.fields().to_vec();
    let old_length = fields[1].length;
    fields[1].length = 20;
    let new = Schema::new(fields, None).unwrap();

    assert_eq!(
        new.compute_record_size().unwrap().get(),
        old_size - old_length + 20
    );
}

#[test]
fn test_record_size_override() {
    let schema = Schema::new(vec![FieldSpec::text("ID", 0, 4)], Some(64)).unwrap();
    assert_eq!(schema.compute_record_size().unwrap().get(), 64);
    assert_eq!(schema.record_size_override(), Some(64));

    // No fields but an explicit size is usable (for raw slicing)
    let schema = Schema::new(Vec::new(), Some(32)).unwrap();
    assert_eq!(schema.compute_record_size().unwrap().get(), 32);
}

#[test]
fn test_record_size_overflow_is_an_error() {
    let half = usize::MAX / 2 + 1;
    let schema = Schema::new(
        vec![FieldSpec::text("A", 0, half), FieldSpec::text("B", 0, half)],
        None,
    )
    .unwrap();
    assert_eq!(
        schema.compute_record_size(),
        Err(CroError::RecordSizeOverflow)
    );
    assert!(matches!(
        schema.layout(TextDecoder::default()),
        Err(CroError::RecordSizeOverflow)
    ));

    // An override skips the sum entirely
    let schema = Schema::new(
        vec![FieldSpec::text("A", 0, half), FieldSpec::text("B", 0, half)],
        Some(16),
    )
    .unwrap();
    assert_eq!(schema.compute_record_size().unwrap().get(), 16);
}

#[test]
fn test_schema_validation() {
    assert_eq!(Schema::new(Vec::new(), None), Err(CroError::EmptySchema));
    assert_eq!(
        Schema::new(vec![FieldSpec::text("ID", 0, 4)], Some(0)),
        Err(CroError::ZeroRecordSize)
    );
    assert_eq!(
        Schema::new(vec![FieldSpec::text("ID", 0, 0)], None),
        Err(CroError::ZeroLengthField("ID".to_string()))
    );
    assert_eq!(
        Schema::new(
            vec![FieldSpec::text("ID", 0, 4), FieldSpec::text("ID", 4, 4)],
            None
        ),
        Err(CroError::DuplicateField("ID".to_string()))
    );
}

#[test]
fn test_overlapping_fields_are_allowed() {
    let schema = Schema::new(
        vec![FieldSpec::text("FULL", 0, 8), FieldSpec::text("HEAD", 0, 2)],
        None,
    )
    .unwrap();
    let layout = schema.layout(TextDecoder::default()).unwrap();
    let row = decode_record(b"ABCDEFGH", &layout).unwrap();
    assert_eq!(row.get("FULL"), Some("ABCDEFGH"));
    assert_eq!(row.get("HEAD"), Some("AB"));
}

#[test]
fn test_iterate_exact_multiple() {
    let data = [7u8; 36];
    let mut chunks = iterate_records(&data, size(12));
    let collected: Vec<&[u8]> = chunks.by_ref().collect();

    assert_eq!(collected.len(), 3);
    assert!(collected.iter().all(|c| c.len() == 12));
    assert!(chunks.warnings().is_empty());
}

#[test]
fn test_iterate_truncated_tail_dropped() {
    let mut data: Vec<u8> = (0..24).collect();
    data.extend_from_slice(&[0xEE; 5]);

    let mut chunks = iterate_records(&data, size(12));
    assert_eq!(chunks.record_count(), 2);
    let collected: Vec<&[u8]> = chunks.by_ref().collect();

    assert_eq!(collected.len(), 2);
    assert!(collected.iter().all(|c| !c.contains(&0xEE)));
    assert_eq!(
        chunks.warnings(),
        &[
            CodecWarning::SizeMismatch {
                buffer_len: 29,
                record_size: 12
            },
            CodecWarning::TruncatedTail {
                offset: 24,
                len: 5,
                record_size: 12
            },
        ]
    );

    // Exhausted iterators stay exhausted and do not repeat the warning
    assert!(chunks.next().is_none());
    assert_eq!(chunks.warnings().len(), 2);
}

#[test]
fn test_iterate_buffer_smaller_than_record() {
    let data = [1u8; 5];
    let mut chunks = iterate_records(&data, size(12));
    assert!(chunks.next().is_none());
    assert!(matches!(
        chunks.warnings().last(),
        Some(CodecWarning::TruncatedTail { offset: 0, len: 5, .. })
    ));
}

#[test]
fn test_iterate_empty_buffer() {
    let mut chunks = iterate_records(&[], size(12));
    assert!(chunks.next().is_none());
    assert!(chunks.warnings().is_empty());
}

#[test]
fn test_decode_field_strips_nulls_and_spaces() {
    let text = TextDecoder::default();
    let decoded = decode_field(b"ABC\x00\x00 ", ColumnKind::Text, &text).unwrap();
    assert_eq!(decoded.text, "ABC");

    let decoded = decode_field(b"A B \x00 \x00", ColumnKind::Text, &text).unwrap();
    assert_eq!(decoded.text, "A B");

    // Leading padding is kept
    let decoded = decode_field(b"  X", ColumnKind::Text, &text).unwrap();
    assert_eq!(decoded.text, "  X");

    let decoded = decode_field(b"\x00\x00  ", ColumnKind::Text, &text).unwrap();
    assert_eq!(decoded.text, "");
}

#[test]
fn test_decode_field_removes_line_breaks() {
    let text = TextDecoder::default();
    let decoded = decode_field(b"line1\r\nline2\nend", ColumnKind::Text, &text).unwrap();
    assert_eq!(decoded.text, "line1line2end");
}

#[test]
fn test_decode_field_cp1251_and_replacement() {
    let text = TextDecoder::default();
    // "Петров" followed by an unassigned byte and padding
    let raw = [0xCF, 0xE5, 0xF2, 0xF0, 0xEE, 0xE2, 0x98, 0x00, 0x20];
    let decoded = decode_field(&raw, ColumnKind::Text, &text).unwrap();
    assert_eq!(decoded.text, "Петров\u{FFFD}");
    assert_eq!(decoded.replaced, 1);

    let strict = TextDecoder::new(CodePage::Cp1251, DecodePolicy::Strict);
    assert!(matches!(
        decode_field(&raw, ColumnKind::Text, &strict),
        Err(CroError::UndecodableByte { byte: 0x98, .. })
    ));
}

#[test]
fn test_decode_record_clamps_out_of_range_fields() {
    let schema = Schema::new(
        vec![
            FieldSpec::text("A", 0, 4),
            FieldSpec::text("B", 6, 10),
            FieldSpec::text("C", 40, 4),
        ],
        Some(8),
    )
    .unwrap();
    let layout = schema.layout(TextDecoder::default()).unwrap();

    let row = decode_record(b"abcdefgh", &layout).unwrap();
    assert_eq!(row.get("A"), Some("abcd"));
    assert_eq!(row.get("B"), Some("gh"));
    assert_eq!(row.get("C"), Some(""));
}

#[test]
fn test_export_end_to_end() {
    let schema = people_schema();
    let layout = schema.layout(TextDecoder::default()).unwrap();
    assert_eq!(layout.record_size().get(), 12);

    let out = export(&people_bank(), layout).unwrap();
    assert!(out.warnings.is_empty());
    assert_eq!(out.replaced, 0);
    assert_eq!(out.rows.len(), 2);

    let first: Vec<(&str, &str)> = out.rows[0].iter().collect();
    assert_eq!(first, vec![("ID", "0001"), ("NAME", "ALICE")]);
    let second: Vec<(&str, &str)> = out.rows[1].iter().collect();
    assert_eq!(second, vec![("ID", "0002"), ("NAME", "BOB")]);
}

#[test]
fn test_export_keeps_warnings_apart_from_rows() {
    let schema = people_schema();
    let layout = schema.layout(TextDecoder::default()).unwrap();

    let mut data = people_bank();
    data.extend_from_slice(b"0003AL");

    let out = export(&data, layout).unwrap();
    assert_eq!(out.rows.len(), 2);
    assert_eq!(out.warnings.len(), 2);
}

#[test]
fn test_rows_iterator_counts_replacements() {
    let schema = Schema::new(vec![FieldSpec::text("X", 0, 2)], None).unwrap();
    let layout = schema.layout(TextDecoder::default()).unwrap();

    let data = b"a\x98\x98\x98";
    let mut rows = Rows::new(data, layout);
    let values: Vec<String> = rows
        .by_ref()
        .map(|r| r.unwrap().get("X").unwrap().to_string())
        .collect();

    assert_eq!(values, vec!["a\u{FFFD}", "\u{FFFD}\u{FFFD}"]);
    assert_eq!(rows.replaced(), 3);
    assert!(rows.warnings().is_empty());
}

#[test]
fn test_export_strict_policy_fails() {
    let schema = Schema::new(vec![FieldSpec::text("X", 0, 2)], None).unwrap();
    let layout = schema
        .layout(TextDecoder::new(CodePage::Cp1251, DecodePolicy::Strict))
        .unwrap();
    assert!(export(b"ok\x98!", layout).is_err());
}

#[test]
fn test_parallel_export_matches_sequential() {
    let schema = people_schema();
    let layout = schema.layout(TextDecoder::default()).unwrap();

    let mut data = Vec::new();
    for i in 0..500 {
        data.extend_from_slice(format!("{:04}", i).as_bytes());
        data.extend_from_slice(b"NAME\x98\0\0\0");
    }
    data.extend_from_slice(b"tail");

    let sequential = export(&data, layout).unwrap();
    let parallel = export_parallel(&data, layout).unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(parallel.rows.len(), 500);
    assert_eq!(parallel.rows[499].get("ID"), Some("0499"));
    assert_eq!(parallel.replaced, 500);
    assert_eq!(parallel.warnings.len(), 2);
}
