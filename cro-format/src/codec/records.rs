//! Fixed-size record chunking

use std::num::NonZeroUsize;

use tracing::warn;

/// Non-fatal problems found while chunking a bank stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecWarning {
    /// Buffer length is not a multiple of the record size
    SizeMismatch {
        buffer_len: usize,
        record_size: usize,
    },
    /// Final chunk was shorter than a record and was dropped
    TruncatedTail {
        offset: usize,
        len: usize,
        record_size: usize,
    },
}

impl std::fmt::Display for CodecWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SizeMismatch {
                buffer_len,
                record_size,
            } => write!(
                f,
                "buffer size {} is not a multiple of record size {}; there may be a header/footer or the schema is wrong",
                buffer_len, record_size
            ),
            Self::TruncatedTail {
                offset,
                len,
                record_size,
            } => write!(
                f,
                "truncated record at offset {} ({} of {} bytes), dropped",
                offset, len, record_size
            ),
        }
    }
}

/// Forward-only iterator over whole records.
///
/// Warnings accumulate in [`RecordChunks::warnings`] as they are found; the
/// size mismatch is known up front, the truncated tail once iteration
/// reaches it. To restart, build a new iterator.
#[derive(Debug, Clone)]
pub struct RecordChunks<'a> {
    data: &'a [u8],
    record_size: usize,
    pos: usize,
    finished: bool,
    warnings: Vec<CodecWarning>,
}

impl<'a> RecordChunks<'a> {
    pub fn new(data: &'a [u8], record_size: NonZeroUsize) -> Self {
        let record_size = record_size.get();
        let mut warnings = Vec::new();

        if data.len() % record_size != 0 {
            let warning = CodecWarning::SizeMismatch {
                buffer_len: data.len(),
                record_size,
            };
            warn!("{}", warning);
            warnings.push(warning);
        }

        Self {
            data,
            record_size,
            pos: 0,
            finished: false,
            warnings,
        }
    }

    pub fn warnings(&self) -> &[CodecWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<CodecWarning> {
        self.warnings
    }

    /// Number of whole records in the buffer
    pub fn record_count(&self) -> usize {
        self.data.len() / self.record_size
    }
}

impl<'a> Iterator for RecordChunks<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let remaining = self.data.len() - self.pos;
        if remaining >= self.record_size {
            let chunk = &self.data[self.pos..self.pos + self.record_size];
            self.pos += self.record_size;
            return Some(chunk);
        }

        self.finished = true;
        if remaining > 0 {
            let warning = CodecWarning::TruncatedTail {
                offset: self.pos,
                len: remaining,
                record_size: self.record_size,
            };
            warn!("{}", warning);
            self.warnings.push(warning);
        }
        None
    }
}

/// Split `data` into consecutive `record_size` chunks
pub fn iterate_records(data: &[u8], record_size: NonZeroUsize) -> RecordChunks<'_> {
    RecordChunks::new(data, record_size)
}
