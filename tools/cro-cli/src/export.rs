//! Export command - decode CroBank.dat into delimited text using a schema

use anyhow::{Context, Result, bail};
use clap::Args;
use cro_format::{BANK_FILE, DecodedRow, Plaintext, Rows, export_parallel};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::delimited::DelimitedWriter;
use crate::input::{read_stream, require_stream};
use crate::schema::load_schema;

/// Arguments for the export command
#[derive(Args)]
pub struct ExportArgs {
    /// Directory containing CroBank.dat
    pub base_dir: PathBuf,

    /// Schema file describing the record layout
    #[arg(long, short)]
    pub schema: PathBuf,

    /// Output file
    #[arg(long, short, default_value = "CroBank_export.csv")]
    pub output: PathBuf,

    /// Column delimiter
    #[arg(long, short, default_value_t = ',')]
    pub delimiter: char,

    /// Decode records on all cores
    #[arg(long)]
    pub parallel: bool,
}

/// Execute the export command
pub fn execute(args: ExportArgs) -> Result<()> {
    if args.delimiter == '"' || args.delimiter == '\n' || args.delimiter == '\r' {
        bail!("Delimiter {:?} cannot be used", args.delimiter);
    }

    let bank_path = require_stream(&args.base_dir, BANK_FILE)?;
    let loaded = load_schema(&args.schema)?;
    let layout = loaded.schema.layout(loaded.text)?;

    info!("Using record size = {} bytes", layout.record_size());
    info!(
        "Fields: {:?}",
        loaded.schema.field_names().collect::<Vec<_>>()
    );
    info!("Reading {}", bank_path.display());

    let bank = read_stream(&bank_path, &Plaintext)?;
    let body: &[u8] = match bank.get(loaded.data_offset..) {
        Some(body) => body,
        None => {
            warn!(
                "Data offset {} is past the end of {} ({} bytes), no records to export",
                loaded.data_offset,
                bank_path.display(),
                bank.len()
            );
            &[]
        }
    };

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = DelimitedWriter::new(BufWriter::new(file), args.delimiter);
    writer.write_row(loaded.schema.field_names())?;

    // Size warnings are logged by the codec as they are found
    let (count, replaced) = if args.parallel {
        let out = export_parallel(body, layout)?;
        write_rows(&mut writer, &out.rows)?;
        (out.rows.len(), out.replaced)
    } else {
        let mut rows = Rows::new(body, layout);
        let mut count = 0;
        for row in rows.by_ref() {
            writer.write_row(row?.values())?;
            count += 1;
        }
        (count, rows.replaced())
    };

    writer.flush()?;

    if replaced > 0 {
        warn!("{} undecodable bytes were replaced or skipped", replaced);
    }
    println!("Exported {} records to {}", count, args.output.display());

    Ok(())
}

fn write_rows<W: Write>(writer: &mut DelimitedWriter<W>, rows: &[DecodedRow]) -> Result<()> {
    for row in rows {
        writer.write_row(row.values())?;
    }
    Ok(())
}
