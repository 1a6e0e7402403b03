//! Record schema and layout

use std::num::NonZeroUsize;

use hashbrown::HashSet;

use crate::encoding::TextDecoder;
use crate::error::CroError;

/// How a column's bytes are interpreted. Only text exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    #[default]
    Text,
}

/// One column of a fixed-width record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    /// Byte offset from the start of the record
    pub offset: usize,
    /// Byte length, always > 0 once validated
    pub length: usize,
    pub kind: ColumnKind,
}

impl FieldSpec {
    pub fn text(name: impl Into<String>, offset: usize, length: usize) -> Self {
        Self {
            name: name.into(),
            offset,
            length,
            kind: ColumnKind::Text,
        }
    }
}

/// Validated, immutable list of columns.
///
/// Field ranges may overlap or leave gaps; the codec only slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    record_size: Option<NonZeroUsize>,
}

impl Schema {
    /// Validate `fields` and an optional explicit record size
    pub fn new(fields: Vec<FieldSpec>, record_size: Option<usize>) -> Result<Self, CroError> {
        let record_size = match record_size {
            Some(size) => Some(NonZeroUsize::new(size).ok_or(CroError::ZeroRecordSize)?),
            None => None,
        };

        if fields.is_empty() && record_size.is_none() {
            return Err(CroError::EmptySchema);
        }

        {
            let mut seen = HashSet::with_capacity(fields.len());
            for field in &fields {
                if field.length == 0 {
                    return Err(CroError::ZeroLengthField(field.name.clone()));
                }
                if !seen.insert(field.name.as_str()) {
                    return Err(CroError::DuplicateField(field.name.clone()));
                }
            }
        }

        Ok(Self {
            fields,
            record_size,
        })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Explicit record size if one was given
    pub fn record_size_override(&self) -> Option<usize> {
        self.record_size.map(NonZeroUsize::get)
    }

    /// Record size: the override, or the sum of all field lengths.
    ///
    /// A sum that does not fit in `usize` is [`CroError::RecordSizeOverflow`].
    pub fn compute_record_size(&self) -> Result<NonZeroUsize, CroError> {
        if let Some(size) = self.record_size {
            return Ok(size);
        }
        let total = self
            .fields
            .iter()
            .try_fold(0usize, |acc, f| acc.checked_add(f.length))
            .ok_or(CroError::RecordSizeOverflow)?;
        NonZeroUsize::new(total).ok_or(CroError::EmptySchema)
    }

    /// Fix the record size for one decode pass
    pub fn layout(&self, text: TextDecoder) -> Result<RecordLayout<'_>, CroError> {
        Ok(RecordLayout {
            schema: self,
            record_size: self.compute_record_size()?,
            text,
        })
    }
}

/// Schema with its record size computed once, plus the text decoder.
#[derive(Debug, Clone, Copy)]
pub struct RecordLayout<'s> {
    schema: &'s Schema,
    record_size: NonZeroUsize,
    text: TextDecoder,
}

impl<'s> RecordLayout<'s> {
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn record_size(&self) -> NonZeroUsize {
        self.record_size
    }

    pub fn text_decoder(&self) -> TextDecoder {
        self.text
    }
}

/// Free-function form of [`Schema::compute_record_size`]
pub fn compute_record_size(schema: &Schema) -> Result<NonZeroUsize, CroError> {
    schema.compute_record_size()
}
