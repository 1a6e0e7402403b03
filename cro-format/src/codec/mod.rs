//! Fixed-width record codec for the bank stream
//!
//! The bank stream is a flat run of equally sized records. Column positions
//! come from a hand-written [`Schema`]; this module slices records out of the
//! buffer and turns each column into text. Size problems are reported as
//! [`CodecWarning`]s and never stop decoding. Only an unusable schema (or a
//! strict decode policy meeting an unmapped byte) is an error.

mod records;
mod row;
mod schema;
#[cfg(test)]
mod tests;

use rayon::prelude::*;
use tracing::debug;

use crate::encoding::{DecodedText, TextDecoder};
use crate::error::CroError;

pub use records::{CodecWarning, RecordChunks, iterate_records};
pub use row::DecodedRow;
pub use schema::{ColumnKind, FieldSpec, RecordLayout, Schema, compute_record_size};

/// Bytes stripped from the right of every column before decoding
const PADDING_BYTES: [u8; 2] = [0x00, b' '];

/// Decode one column's raw bytes to text.
///
/// Trailing NUL and space bytes are stripped, the rest is decoded with the
/// code page, then every CR and LF is removed.
pub fn decode_field(
    raw: &[u8],
    kind: ColumnKind,
    text: &TextDecoder,
) -> Result<DecodedText, CroError> {
    let end = raw
        .iter()
        .rposition(|b| !PADDING_BYTES.contains(b))
        .map_or(0, |i| i + 1);

    match kind {
        ColumnKind::Text => {
            let mut decoded = text.decode(&raw[..end])?;
            decoded.text.retain(|c| c != '\r' && c != '\n');
            Ok(decoded)
        }
    }
}

/// Decode one record chunk into a row.
///
/// Column ranges are clamped to the chunk, so a column reaching past the end
/// decodes from whatever bytes exist.
pub fn decode_record(chunk: &[u8], layout: &RecordLayout<'_>) -> Result<DecodedRow, CroError> {
    decode_record_counted(chunk, layout).map(|(row, _)| row)
}

fn decode_record_counted(
    chunk: &[u8],
    layout: &RecordLayout<'_>,
) -> Result<(DecodedRow, usize), CroError> {
    let text = layout.text_decoder();
    let fields = layout.schema().fields();
    let mut row = DecodedRow::with_capacity(fields.len());
    let mut replaced = 0;

    for field in fields {
        let start = field.offset.min(chunk.len());
        let end = field.offset.saturating_add(field.length).min(chunk.len());
        let decoded = decode_field(&chunk[start..end], field.kind, &text)?;
        replaced += decoded.replaced;
        row.push(&field.name, decoded.text);
    }

    Ok((row, replaced))
}

/// Lazily decoded rows of a bank buffer
pub struct Rows<'a, 's> {
    chunks: RecordChunks<'a>,
    layout: RecordLayout<'s>,
    replaced: usize,
}

impl<'a, 's> Rows<'a, 's> {
    pub fn new(data: &'a [u8], layout: RecordLayout<'s>) -> Self {
        Self {
            chunks: iterate_records(data, layout.record_size()),
            layout,
            replaced: 0,
        }
    }

    /// Warnings found so far
    pub fn warnings(&self) -> &[CodecWarning] {
        self.chunks.warnings()
    }

    /// Bytes replaced or skipped by the text decoder so far
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    pub fn into_warnings(self) -> Vec<CodecWarning> {
        self.chunks.into_warnings()
    }
}

impl Iterator for Rows<'_, '_> {
    type Item = Result<DecodedRow, CroError>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        Some(decode_record_counted(chunk, &self.layout).map(|(row, replaced)| {
            self.replaced += replaced;
            row
        }))
    }
}

/// Every row of a bank buffer, with warnings kept apart from rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Export {
    pub rows: Vec<DecodedRow>,
    pub warnings: Vec<CodecWarning>,
    /// Bytes replaced or skipped by the text decoder
    pub replaced: usize,
}

/// Decode every whole record in `data`
pub fn export(data: &[u8], layout: RecordLayout<'_>) -> Result<Export, CroError> {
    let mut rows_iter = Rows::new(data, layout);
    let rows = rows_iter.by_ref().collect::<Result<Vec<_>, _>>()?;
    let replaced = rows_iter.replaced();

    debug!(
        "Decoded {} records of {} bytes",
        rows.len(),
        layout.record_size()
    );

    Ok(Export {
        rows,
        warnings: rows_iter.into_warnings(),
        replaced,
    })
}

/// Same as [`export`], decoding records on the rayon thread pool.
///
/// Rows come back in buffer order.
pub fn export_parallel(data: &[u8], layout: RecordLayout<'_>) -> Result<Export, CroError> {
    let mut chunks = iterate_records(data, layout.record_size());
    let slices: Vec<&[u8]> = chunks.by_ref().collect();

    let decoded = slices
        .par_iter()
        .map(|chunk| decode_record_counted(chunk, &layout))
        .collect::<Result<Vec<_>, _>>()?;

    let replaced: usize = decoded.iter().map(|(_, n)| n).sum();
    let rows = decoded.into_iter().map(|(row, _)| row).collect::<Vec<_>>();

    debug!(
        "Decoded {} records of {} bytes in parallel",
        rows.len(),
        layout.record_size()
    );

    Ok(Export {
        rows,
        warnings: chunks.into_warnings(),
        replaced,
    })
}
