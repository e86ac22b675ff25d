//! Cell-by-cell comparison of the original and cleaned tables.
//!
//! All counters are sums of non-negative integers and unions of sets, so the
//! report is deterministic and independent of traversal order. The original
//! table is only read here; it is discarded by the caller once the report
//! exists.

use tabscrub_model::{
    CleaningConfig, CleaningReport, ColumnReport, RepairWarning, Result, Table,
};
use tracing::debug;

/// Everything the diff engine consumes: pre- and post-state plus what
/// structural repair already knows about the columns.
pub struct DiffInput<'a> {
    pub original: &'a Table,
    pub cleaned: &'a Table,
    pub config: &'a CleaningConfig,
    /// Cleaned column index → original column index.
    pub column_origins: &'a [usize],
    pub encoding: String,
    pub bytes_before: usize,
    pub dropped_columns: usize,
    pub empty_columns_removed: usize,
    pub merged_columns: usize,
    pub warnings: Vec<RepairWarning>,
}

/// Trailing whitespace characters on one cell, in characters (not bytes).
fn trailing_whitespace_chars(cell: &str) -> u64 {
    (cell.chars().count() - cell.trim_end().chars().count()) as u64
}

/// Serialized size estimate: cell bytes plus delimiters and one newline per
/// row. Good enough for the before/after delta; the exact size depends on
/// quoting and output encoding.
pub fn approximate_serialized_size(table: &Table) -> usize {
    let row_size =
        |row: &[String]| row.iter().map(String::len).sum::<usize>() + row.len().saturating_sub(1) + 1;
    let header_size = table
        .headers
        .as_ref()
        .map(|headers| row_size(headers))
        .unwrap_or(0);
    header_size + table.rows.iter().map(|row| row_size(row)).sum::<usize>()
}

/// Compare original and cleaned state and build the cleaning report.
pub fn diff(input: DiffInput<'_>) -> Result<CleaningReport> {
    let original = input.original;
    let cleaned = input.cleaned;
    let whitespace = input.config.whitespace_columns.mask(original)?;

    // Invert the origin mapping so each original column finds its survivor.
    let mut cleaned_position: Vec<Option<usize>> = vec![None; original.width()];
    for (cleaned_idx, &orig_idx) in input.column_origins.iter().enumerate() {
        cleaned_position[orig_idx] = Some(cleaned_idx);
    }

    let mut report = CleaningReport {
        encoding: input.encoding,
        rows_before: original.height(),
        rows_after: cleaned.height(),
        columns_before: original.width(),
        columns_after: cleaned.width(),
        columns_dropped: input.dropped_columns,
        empty_columns_removed: input.empty_columns_removed,
        merged_columns: input.merged_columns,
        bytes_before: input.bytes_before,
        bytes_after: approximate_serialized_size(cleaned),
        warnings: input.warnings,
        ..CleaningReport::default()
    };

    for orig_idx in 0..original.width() {
        let mut column = ColumnReport::default();
        if whitespace[orig_idx] {
            column.trailing_spaces_removed = original
                .column(orig_idx)
                .map(trailing_whitespace_chars)
                .sum();
        }
        if let Some(cleaned_idx) = cleaned_position[orig_idx] {
            for (orig_row, cleaned_row) in original.rows.iter().zip(&cleaned.rows) {
                let orig_cell = orig_row[orig_idx].as_str();
                let cleaned_cell = cleaned_row[cleaned_idx].as_str();
                if orig_cell != cleaned_cell {
                    column.changed_cells += 1;
                }
                for ch in orig_cell.chars() {
                    if !cleaned_cell.contains(ch) {
                        column.removed_chars.insert(ch);
                    }
                }
            }
        }
        report.spaces_removed_total += column.trailing_spaces_removed;
        report.changed_cells_total += column.changed_cells;
        report
            .columns
            .insert(original.column_label(orig_idx), column);
    }

    debug!(
        changed_cells = report.changed_cells_total,
        spaces_removed = report.spaces_removed_total,
        columns_dropped = report.columns_dropped,
        "diff computed"
    );
    Ok(report)
}
