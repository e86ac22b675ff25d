//! The cleaning report: what one run changed, counted deterministically.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Per-column change counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnReport {
    /// Cells whose cleaned value differs from the original at all.
    pub changed_cells: u64,
    /// Trailing whitespace characters removed, summed over rows.
    pub trailing_spaces_removed: u64,
    /// Characters present in an original cell but absent from its cleaned
    /// cell, unioned across the column.
    pub removed_chars: BTreeSet<char>,
}

/// Non-fatal structural-repair finding: the condition is reported, not thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairWarning {
    /// Zero-based column position at the time the heuristic ran.
    pub column: usize,
    pub label: String,
    pub message: String,
}

/// Accumulated counters for one cleaning run. Built by the diff engine,
/// read-only once returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Detected input encoding label.
    pub encoding: String,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    /// Columns removed by structural repair, all causes combined.
    pub columns_dropped: usize,
    pub empty_columns_removed: usize,
    /// Columns consumed by merges (anomalous and explicit).
    pub merged_columns: usize,
    pub bytes_before: usize,
    pub bytes_after: usize,
    pub spaces_removed_total: u64,
    pub changed_cells_total: u64,
    /// Per-column counters keyed by the original column label.
    pub columns: BTreeMap<String, ColumnReport>,
    pub warnings: Vec<RepairWarning>,
}

impl CleaningReport {
    /// Union of every character removed anywhere in the table.
    pub fn removed_characters(&self) -> BTreeSet<char> {
        self.columns
            .values()
            .flat_map(|column| column.removed_chars.iter().copied())
            .collect()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The report as a plain metric-name → value mapping, for display or logging.
    pub fn metrics(&self) -> BTreeMap<String, String> {
        let mut metrics = BTreeMap::new();
        metrics.insert("encoding".to_string(), self.encoding.clone());
        metrics.insert("rows_before".to_string(), self.rows_before.to_string());
        metrics.insert("rows_after".to_string(), self.rows_after.to_string());
        metrics.insert(
            "columns_before".to_string(),
            self.columns_before.to_string(),
        );
        metrics.insert("columns_after".to_string(), self.columns_after.to_string());
        metrics.insert(
            "columns_dropped".to_string(),
            self.columns_dropped.to_string(),
        );
        metrics.insert(
            "empty_columns_removed".to_string(),
            self.empty_columns_removed.to_string(),
        );
        metrics.insert(
            "merged_columns".to_string(),
            self.merged_columns.to_string(),
        );
        metrics.insert("bytes_before".to_string(), self.bytes_before.to_string());
        metrics.insert("bytes_after".to_string(), self.bytes_after.to_string());
        metrics.insert(
            "spaces_removed_total".to_string(),
            self.spaces_removed_total.to_string(),
        );
        metrics.insert(
            "changed_cells_total".to_string(),
            self.changed_cells_total.to_string(),
        );
        metrics.insert(
            "removed_characters".to_string(),
            self.removed_characters().into_iter().collect::<String>(),
        );
        metrics.insert("warnings".to_string(), self.warnings.len().to_string());
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_characters_unions_columns() {
        let mut report = CleaningReport::default();
        report.columns.insert(
            "a".to_string(),
            ColumnReport {
                changed_cells: 1,
                trailing_spaces_removed: 0,
                removed_chars: ['!', '|'].into_iter().collect(),
            },
        );
        report.columns.insert(
            "b".to_string(),
            ColumnReport {
                changed_cells: 1,
                trailing_spaces_removed: 2,
                removed_chars: ['|', '%'].into_iter().collect(),
            },
        );
        let removed: Vec<char> = report.removed_characters().into_iter().collect();
        assert_eq!(removed, vec!['!', '%', '|']);
    }

    #[test]
    fn metrics_expose_every_counter() {
        let mut report = CleaningReport {
            encoding: "UTF-8".to_string(),
            rows_before: 3,
            rows_after: 3,
            columns_before: 4,
            columns_after: 3,
            columns_dropped: 1,
            empty_columns_removed: 1,
            spaces_removed_total: 7,
            ..CleaningReport::default()
        };
        report.warnings.push(RepairWarning {
            column: 2,
            label: "column 2".to_string(),
            message: "neighbors not email-like".to_string(),
        });
        let metrics = report.metrics();
        assert_eq!(metrics.get("encoding").map(String::as_str), Some("UTF-8"));
        assert_eq!(metrics.get("columns_dropped").map(String::as_str), Some("1"));
        assert_eq!(
            metrics.get("spaces_removed_total").map(String::as_str),
            Some("7")
        );
        assert_eq!(metrics.get("warnings").map(String::as_str), Some("1"));
    }

    #[test]
    fn report_round_trips_through_json() {
        let mut report = CleaningReport::default();
        report.encoding = "windows-1252".to_string();
        report.columns.insert(
            "name".to_string(),
            ColumnReport {
                changed_cells: 2,
                trailing_spaces_removed: 4,
                removed_chars: ['!'].into_iter().collect(),
            },
        );
        let json = serde_json::to_string(&report).expect("serialize report");
        let round: CleaningReport = serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(round, report);
    }
}
