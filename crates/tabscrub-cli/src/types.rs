use std::path::PathBuf;

use tabscrub_model::{CleaningReport, Table};

/// The first rows of a table, for terminal preview rendering.
#[derive(Debug, Clone)]
pub struct Preview {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl Preview {
    pub fn head(table: &Table, rows: usize) -> Self {
        Self {
            headers: table.headers.clone(),
            rows: table.rows.iter().take(rows).cloned().collect(),
            total_rows: table.height(),
        }
    }
}

#[derive(Debug)]
pub struct CleanRunSummary {
    pub input: PathBuf,
    /// Where the cleaned file was written; None for dry runs.
    pub output: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
    pub original_preview: Preview,
    pub cleaned_preview: Preview,
    pub report: CleaningReport,
}

#[derive(Debug)]
pub struct InspectSummary {
    pub input: PathBuf,
    pub encoding: String,
    pub bom: bool,
    pub bytes: usize,
    pub rows: usize,
    pub columns: usize,
    pub preview: Preview,
}
