//! Serialization of a run's records to `<directory>/<run timestamp>.<ext>`.
//!
//! Each run writes a new file; earlier files are never touched, so the
//! dataset grows append-only across runs.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{OutputConfig, OutputFormat};
use crate::models::{format_timestamp, RunOutput};
use crate::utils::error::{AppError, Result};

/// Tabular columns, in output order.
pub const CANONICAL_COLUMNS: [&str; 9] = [
    "discount",
    "availability",
    "price",
    "stock",
    "color",
    "retailer",
    "url",
    "description",
    "timestamp",
];

const SEPARATOR: char = ',';

pub fn output_path(config: &OutputConfig, output: &RunOutput) -> PathBuf {
    config.directory.join(format!(
        "{}.{}",
        format_timestamp(&output.timestamp),
        config.format.ext()
    ))
}

/// Write the run output, creating the output directory if needed.
///
/// An empty run still produces a file (`[]` or a header-only table).
pub async fn write_output(config: &OutputConfig, output: &RunOutput) -> Result<PathBuf> {
    ensure_directory(&config.directory).await?;

    let contents = match config.format {
        OutputFormat::Json => to_json(output)?,
        OutputFormat::Csv => to_csv(output)?,
    };

    let path = output_path(config, output);
    tokio::fs::write(&path, contents).await?;

    tracing::info!(
        path = %path.display(),
        records = output.len(),
        "Wrote run output"
    );
    Ok(path)
}

async fn ensure_directory(directory: &Path) -> Result<()> {
    if !directory.exists() {
        tracing::debug!(directory = %directory.display(), "Creating output directory");
    }
    tokio::fs::create_dir_all(directory).await?;
    Ok(())
}

pub fn to_json(output: &RunOutput) -> Result<String> {
    Ok(serde_json::to_string(&output.records)?)
}

/// Columns present in at least one record, in canonical order.
/// With no records every canonical column is kept so the header is complete.
pub fn columns(output: &RunOutput) -> Vec<&'static str> {
    if output.is_empty() {
        return CANONICAL_COLUMNS.to_vec();
    }

    CANONICAL_COLUMNS
        .iter()
        .copied()
        .filter(|column| output.records.iter().any(|record| record.has_column(column)))
        .collect()
}

pub fn to_csv(output: &RunOutput) -> Result<String> {
    let columns = columns(output);
    let mut buf: Vec<u8> = Vec::new();

    let header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    write_row(&mut buf, &header, SEPARATOR)?;

    for record in &output.records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| record.column(column).unwrap_or_default())
            .collect();
        write_row(&mut buf, &row, SEPARATOR)?;
    }

    String::from_utf8(buf).map_err(|e| AppError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, "{}", sep)?;
        } else {
            first = false;
        }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}
