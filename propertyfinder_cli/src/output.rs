use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::ValueEnum;
use propertyfinder_lib::{ExportRow, OutputError, ResultSink, SearchTarget, EXPORT_COLUMNS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Writes each target's rows to `<dir>/<token>_database.<ext>`.
pub struct FileSink {
    dir: PathBuf,
    format: OutputFormat,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn path_for(&self, target: &SearchTarget) -> PathBuf {
        self.dir.join(target.artifact_name(self.format.extension()))
    }

    fn write_file(&self, path: &Path, rows: &[ExportRow]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut out = BufWriter::new(File::create(path)?);
        match self.format {
            OutputFormat::Csv => write_csv(&mut out, rows)?,
            OutputFormat::Json => write_json(&mut out, rows)?,
        }
        out.flush()?;
        Ok(())
    }
}

impl ResultSink for FileSink {
    fn write(&self, target: &SearchTarget, rows: &[ExportRow]) -> Result<PathBuf, OutputError> {
        let path = self.path_for(target);
        self.write_file(&path, rows).map_err(|e| OutputError {
            artifact: path.display().to_string(),
            message: format!("{:#}", e),
        })?;
        Ok(path)
    }
}

/// Writes `rows` as CSV with an upper-case header. An empty result still
/// gets the header row.
pub fn write_csv<W: Write>(out: W, rows: &[ExportRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    if rows.is_empty() {
        wtr.write_record(EXPORT_COLUMNS)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(out: W, rows: &[ExportRow]) -> Result<()> {
    serde_json::to_writer_pretty(out, rows)?;
    Ok(())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
