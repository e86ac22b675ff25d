//! The cleaning pipeline with explicit stages.
//!
//! Stages run in order:
//! 1. **Detect**: guess the input encoding from the raw bytes
//! 2. **Parse**: decode and split into rows and columns
//! 3. **Validate**: check the configuration against the parsed table, before
//!    any mutation
//! 4. **Repair**: structural fixes (anomalous/explicit merges, blank columns)
//! 5. **Normalize**: per-cell rules
//! 6. **Diff**: compare pre- and post-state into the cleaning report
//! 7. **Serialize**: render the cleaned table to output bytes
//!
//! One invocation owns its tables and report; nothing is shared across runs
//! and nothing is retried. The original table lives exactly as long as the
//! diff needs it.

use std::time::Instant;

use tracing::{info, info_span};

use tabscrub_ingest::{detect, parse_table};
use tabscrub_model::{CleaningConfig, CleaningReport, Result, Table};
use tabscrub_output::serialize;
use tabscrub_report::{DiffInput, diff};
use tabscrub_transform::{normalize, repair};

/// What one cleaning run returns: the cleaned table, the report, and the
/// serialized output bytes.
#[derive(Debug)]
pub struct RunOutcome {
    pub cleaned: Table,
    pub report: CleaningReport,
    pub output: Vec<u8>,
}

/// Run the whole pipeline on one input buffer.
pub fn run(bytes: Vec<u8>, config: &CleaningConfig) -> Result<RunOutcome> {
    let run_span = info_span!("clean", bytes = bytes.len());
    let _run_guard = run_span.enter();
    let run_start = Instant::now();

    config.validate()?;
    let bytes_before = bytes.len();

    let guess = info_span!("detect").in_scope(|| detect(bytes));
    let original = info_span!("parse").in_scope(|| parse_table(&guess, config))?;
    config.validate_against(&original)?;

    let repaired = info_span!("repair").in_scope(|| repair(original.clone(), config))?;
    let cleaned = info_span!("normalize").in_scope(|| normalize(&repaired.table, config))?;

    let report = info_span!("diff").in_scope(|| {
        diff(DiffInput {
            original: &original,
            cleaned: &cleaned,
            config,
            column_origins: &repaired.column_origins,
            encoding: guess.label().to_string(),
            bytes_before,
            dropped_columns: repaired.dropped_columns,
            empty_columns_removed: repaired.empty_columns_removed,
            merged_columns: repaired.merged_columns,
            warnings: repaired.warnings,
        })
    })?;

    let output = info_span!("serialize").in_scope(|| serialize(&cleaned, config))?;

    info!(
        encoding = guess.label(),
        rows = cleaned.height(),
        columns = cleaned.width(),
        changed_cells = report.changed_cells_total,
        duration_ms = run_start.elapsed().as_millis() as u64,
        "cleaning complete"
    );
    Ok(RunOutcome {
        cleaned,
        report,
        output,
    })
}
