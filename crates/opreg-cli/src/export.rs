//! Write filtered records to CSV or JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, SerWriter};
use tracing::info;

use opreg_model::CaseRecord;
use opreg_transform::cases_to_frame;

use crate::cli::ExportFormatArg;

/// Write `records` to `path` and return the number of rows written.
pub fn write_export(records: &[&CaseRecord], path: &Path, format: ExportFormatArg) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    match format {
        ExportFormatArg::Csv => {
            let mut frame = cases_to_frame(records.iter().copied()).context("build export frame")?;
            CsvWriter::new(&mut writer)
                .include_header(true)
                .finish(&mut frame)
                .with_context(|| format!("write {}", path.display()))?;
        }
        ExportFormatArg::Json => {
            serde_json::to_writer_pretty(&mut writer, records)
                .with_context(|| format!("write {}", path.display()))?;
        }
    }
    writer
        .flush()
        .with_context(|| format!("write {}", path.display()))?;
    info!(rows = records.len(), path = %path.display(), "export written");
    Ok(records.len())
}
