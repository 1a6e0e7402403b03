//! Schema file parsing
//!
//! Bank layouts are reverse engineered by hand and kept in a TOML file next
//! to the database:
//!
//! ```toml
//! encoding = "cp1251"
//! decode_policy = "replace"
//! record_size = 128
//! data_offset = 0
//!
//! [[fields]]
//! name = "ID"
//! offset = 0
//! length = 10
//! ```

use anyhow::{Context, Result, bail};
use cro_format::{CodePage, ColumnKind, DecodePolicy, FieldSpec, Schema, TextDecoder};
use serde::Deserialize;
use std::path::Path;

/// Schema file structure
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    /// Code page of text columns. Default: cp1251
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// replace, skip or strict. Default: replace
    #[serde(default = "default_policy")]
    pub decode_policy: String,

    /// Explicit record size; defaults to the sum of field lengths
    #[serde(default)]
    pub record_size: Option<usize>,

    /// Bytes before the first record (e.g. a file header)
    #[serde(default)]
    pub data_offset: usize,

    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

fn default_encoding() -> String {
    "cp1251".to_string()
}

fn default_policy() -> String {
    "replace".to_string()
}

/// Single column entry
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub name: String,
    pub offset: usize,
    pub length: usize,
    /// Only "text" for now
    #[serde(default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "text".to_string()
}

/// Schema file validated into library types
#[derive(Debug)]
pub struct LoadedSchema {
    pub schema: Schema,
    pub text: TextDecoder,
    pub data_offset: usize,
}

impl SchemaFile {
    /// Load schema from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid schema: {}", path.display()))
    }

    /// Parse schema from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse schema TOML")
    }

    /// Validate into a [`Schema`] and text decoder
    pub fn into_loaded(self) -> Result<LoadedSchema> {
        let code_page = CodePage::from_name(&self.encoding)?;
        let Some(policy) = DecodePolicy::from_name(&self.decode_policy) else {
            bail!(
                "Unknown decode_policy '{}' (expected replace, skip or strict)",
                self.decode_policy
            );
        };

        let fields = self
            .fields
            .into_iter()
            .map(|entry| {
                let kind = match entry.kind.to_ascii_lowercase().as_str() {
                    "text" | "str" => ColumnKind::Text,
                    other => bail!("Field '{}': unsupported kind '{}'", entry.name, other),
                };
                Ok(FieldSpec {
                    name: entry.name,
                    offset: entry.offset,
                    length: entry.length,
                    kind,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let schema = Schema::new(fields, self.record_size)?;

        Ok(LoadedSchema {
            schema,
            text: TextDecoder::new(code_page, policy),
            data_offset: self.data_offset,
        })
    }
}

/// Load and validate a schema file in one step
pub fn load_schema(path: &Path) -> Result<LoadedSchema> {
    SchemaFile::load(path)?
        .into_loaded()
        .with_context(|| format!("Invalid schema: {}", path.display()))
}
