//! Append-only CSV log of successful searches.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use jurisearch_core::SearchRecord;

pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, writing the header first if the file is new or empty.
    pub fn append(&self, record: &SearchRecord) -> anyhow::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening results log {}", self.path.display()))?;

        let is_empty = file.metadata()?.len() == 0;
        if is_empty {
            writeln!(file, "{}", SearchRecord::HEADER.join(","))?;
        }
        writeln!(
            file,
            "{},{},{}",
            csv_escape(&record.query),
            csv_escape(&record.jurisdictions),
            record.count
        )
        .with_context(|| format!("writing results log {}", self.path.display()))?;
        Ok(())
    }
}

/// Quote a field if it contains commas, quotes, or line breaks.
fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
