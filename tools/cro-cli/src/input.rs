//! Locating and reading database streams

use anyhow::{Context, Result, bail};
use cro_format::StreamDecoder;
use std::path::{Path, PathBuf};

/// Path of a required stream inside `base_dir`, failing if it is missing
pub fn require_stream(base_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let path = base_dir.join(file_name);
    if !path.is_file() {
        bail!("{} not found", path.display());
    }
    Ok(path)
}

/// Read a stream and run it through the decoder
pub fn read_stream(path: &Path, decoder: &impl StreamDecoder) -> Result<Vec<u8>> {
    let raw =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(decoder.decode(&raw))
}
