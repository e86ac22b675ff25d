//! Structural repair: column-count anomalies, explicit merges, blank columns.
//!
//! Repair runs before normalization and is the only stage allowed to change
//! the column count. Row count is never changed. Every removal is tracked in
//! `column_origins` so the diff engine can match cleaned columns back to
//! their original positions.

use tabscrub_model::{
    CleanError, CleaningConfig, MergeSpec, RepairWarning, Result, Table,
};
use tracing::debug;

/// The repaired table plus everything the diff engine needs to know about
/// what happened to the columns.
#[derive(Debug)]
pub struct RepairOutcome {
    pub table: Table,
    /// Cleaned column index → original column index.
    pub column_origins: Vec<usize>,
    /// Columns removed, all causes combined.
    pub dropped_columns: usize,
    pub empty_columns_removed: usize,
    /// Columns consumed by merges (anomalous and explicit).
    pub merged_columns: usize,
    pub warnings: Vec<RepairWarning>,
}

pub fn repair(table: Table, config: &CleaningConfig) -> Result<RepairOutcome> {
    let mut outcome = RepairOutcome {
        column_origins: (0..table.width()).collect(),
        table,
        dropped_columns: 0,
        empty_columns_removed: 0,
        merged_columns: 0,
        warnings: Vec::new(),
    };
    if config.repair_unnamed && outcome.table.headers.is_some() {
        repair_unnamed_columns(&mut outcome);
    }
    if let Some(merge) = &config.merge {
        apply_explicit_merge(&mut outcome, merge)?;
    }
    if config.drop_empty_columns {
        drop_blank_columns(&mut outcome);
    }
    debug!(
        columns = outcome.table.width(),
        dropped = outcome.dropped_columns,
        merged = outcome.merged_columns,
        warnings = outcome.warnings.len(),
        "structural repair done"
    );
    Ok(outcome)
}

fn remove_column(outcome: &mut RepairOutcome, idx: usize) {
    outcome.table.remove_column(idx);
    outcome.column_origins.remove(idx);
    outcome.dropped_columns += 1;
}

/// True when every row of the column contains a literal `@`.
///
/// An empty table gives the heuristic nothing to check, so it does not count
/// as email-like.
fn column_is_email_like(table: &Table, idx: usize) -> bool {
    table.height() > 0 && table.column(idx).all(|cell| cell.contains('@'))
}

/// Merge columns created by an unescaped delimiter inside a field.
///
/// A column with a blank header is an artifact candidate. It is repaired only
/// when both immediate neighbors are fully email-like; anything less certain
/// is surfaced as a warning and left alone.
fn repair_unnamed_columns(outcome: &mut RepairOutcome) {
    let candidates: Vec<usize> = {
        let Some(headers) = outcome.table.headers.as_ref() else {
            return;
        };
        headers
            .iter()
            .enumerate()
            .filter(|(_, name)| name.trim().is_empty())
            .map(|(idx, _)| idx)
            .collect()
    };

    // Highest index first so earlier removals cannot shift later candidates.
    for idx in candidates.into_iter().rev() {
        let label = outcome.table.column_label(idx);
        if idx == 0 || idx + 1 >= outcome.table.width() {
            outcome.warnings.push(RepairWarning {
                column: idx,
                label,
                message: "unnamed column at the table edge; nothing to merge into".to_string(),
            });
            continue;
        }
        let before_ok = column_is_email_like(&outcome.table, idx - 1);
        let after_ok = column_is_email_like(&outcome.table, idx + 1);
        if !(before_ok && after_ok) {
            outcome.warnings.push(RepairWarning {
                column: idx,
                label,
                message: "neighbor columns are not fully email-like; column left unmodified"
                    .to_string(),
            });
            continue;
        }
        for row in &mut outcome.table.rows {
            let value = std::mem::take(&mut row[idx]);
            if value.trim().is_empty() {
                continue;
            }
            let target = &mut row[idx - 1];
            if target.trim().is_empty() {
                *target = value;
            } else {
                target.push_str(", ");
                target.push_str(&value);
            }
        }
        remove_column(outcome, idx);
        outcome.merged_columns += 1;
    }
}

/// Merge caller-named columns: the first receives the separator-join, the
/// rest are dropped. Selectors resolve once, against the current column order.
fn apply_explicit_merge(outcome: &mut RepairOutcome, merge: &MergeSpec) -> Result<()> {
    let mut indices = Vec::with_capacity(merge.columns.len());
    for selector in &merge.columns {
        let idx = selector.resolve(&outcome.table)?;
        if indices.contains(&idx) {
            return Err(CleanError::Config(format!(
                "merge selectors name column {idx} more than once"
            )));
        }
        indices.push(idx);
    }
    let target = indices[0];

    for row in &mut outcome.table.rows {
        if merge.only_shifted_rows
            && row.last().is_some_and(|cell| !cell.trim().is_empty())
        {
            continue;
        }
        let joined = indices
            .iter()
            .map(|&idx| row[idx].as_str())
            .filter(|cell| !cell.trim().is_empty())
            .collect::<Vec<_>>()
            .join(&merge.separator);
        row[target] = joined;
    }

    let mut dropped: Vec<usize> = indices[1..].to_vec();
    dropped.sort_unstable_by(|a, b| b.cmp(a));
    for idx in dropped {
        remove_column(outcome, idx);
        outcome.merged_columns += 1;
    }
    Ok(())
}

/// Drop columns whose every data cell is empty or whitespace-only.
fn drop_blank_columns(outcome: &mut RepairOutcome) {
    let blank: Vec<usize> = (0..outcome.table.width())
        .filter(|&idx| outcome.table.column_is_blank(idx))
        .collect();
    for idx in blank.into_iter().rev() {
        remove_column(outcome, idx);
        outcome.empty_columns_removed += 1;
    }
}
