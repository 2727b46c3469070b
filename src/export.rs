// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! CSV and JSON export of fetched records.
//!
//! CSV goes through the `csv` crate so commas, quotes and newlines inside fields
//! are quoted properly. Header names are the serialized (camelCase) field names.

use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{ErpError, ErpResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(s: &str) -> ErpResult<ExportFormat> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ErpError::validation(
                "format",
                format!("unknown format '{}' (use csv|json)", other),
            )),
        }
    }

    /// Guess from a file extension, defaulting to CSV.
    pub fn from_path(path: &Path) -> ExportFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some(e) if e.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

pub fn write_csv<T: Serialize, W: Write>(rows: &[T], out: W) -> ErpResult<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize, W: Write>(rows: &[T], mut out: W) -> ErpResult<()> {
    serde_json::to_writer_pretty(&mut out, rows)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Write `rows` to `path`. Nothing is created when there is nothing to write
/// in CSV form, since the header would be unknown.
pub fn export_to_path<T: Serialize>(rows: &[T], format: ExportFormat, path: &Path) -> ErpResult<usize> {
    if format == ExportFormat::Csv && rows.is_empty() {
        return Ok(0);
    }
    let file = File::create(path)?;
    match format {
        ExportFormat::Csv => write_csv(rows, file)?,
        ExportFormat::Json => write_json(rows, file)?,
    }
    Ok(rows.len())
}
