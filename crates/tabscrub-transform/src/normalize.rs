//! Cell normalization.
//!
//! The rule order is fixed: delimiter-collapse, whitelist filter, trailing
//! whitespace, trailing marker, column-role rules, and finally the
//! missing-value fill across every column. Each rule is gated per column by
//! the configuration. Normalization never changes row or column counts and
//! is idempotent.

use tabscrub_model::{CharWhitelist, CleaningConfig, ColumnRole, Result, Table};
use tracing::debug;

/// Per-column rule applicability, resolved once before the row sweep.
struct ColumnPlan {
    whitespace: bool,
    filter: bool,
    marker: bool,
    role: Option<ColumnRole>,
}

fn build_plans(table: &Table, config: &CleaningConfig) -> Result<Vec<ColumnPlan>> {
    let whitespace = config.whitespace_columns.mask(table)?;
    let filter = config.filter_columns.mask(table)?;
    let marker = config.marker_columns.mask(table)?;
    let mut roles = vec![None; table.width()];
    for (selector, role) in &config.roles {
        roles[selector.resolve(table)?] = Some(*role);
    }
    Ok((0..table.width())
        .map(|idx| ColumnPlan {
            whitespace: whitespace[idx],
            filter: filter[idx],
            marker: marker[idx] && config.trailing_marker.is_some(),
            role: roles[idx],
        })
        .collect())
}

/// Apply the configured rules to every cell, returning the cleaned table.
pub fn normalize(table: &Table, config: &CleaningConfig) -> Result<Table> {
    let plans = build_plans(table, config)?;
    let mut cleaned = table.clone();
    for row in &mut cleaned.rows {
        for (idx, cell) in row.iter_mut().enumerate() {
            *cell = normalize_cell(cell, &plans[idx], config);
        }
    }
    // Missing-value fill runs once, after all other rules, across every column.
    for row in &mut cleaned.rows {
        for cell in row.iter_mut() {
            if cell.is_empty() {
                cell.clone_from(&config.default_value);
            }
        }
    }
    debug!(
        rows = cleaned.height(),
        columns = cleaned.width(),
        "normalization done"
    );
    Ok(cleaned)
}

fn normalize_cell(cell: &str, plan: &ColumnPlan, config: &CleaningConfig) -> String {
    let mut value = cell.to_string();
    if plan.whitespace {
        value = collapse_after_delimiter(&value, config.delimiter);
    }
    if plan.filter {
        value = filter_whitelist(&value, &config.whitelist);
    }
    if plan.whitespace {
        let stripped = value.trim_end().len();
        value.truncate(stripped);
    }
    if plan.marker
        && let Some(marker) = config.trailing_marker
    {
        // Stripping a marker can expose trailing whitespace (and vice versa);
        // loop to a fixed point so a second normalization pass finds nothing
        // left to do. The whitespace trim only re-runs where that rule is on.
        loop {
            let mut stripped = value.trim_end_matches(marker).len();
            if plan.whitespace {
                stripped = value[..stripped].trim_end().len();
            }
            if stripped == value.len() {
                break;
            }
            value.truncate(stripped);
        }
    }
    if let Some(role) = plan.role {
        value = apply_role(&value, role, config.delimiter);
    }
    value
}

/// Remove whitespace that immediately follows the delimiter inside a cell,
/// so "a, b" and "a,b" split the same way downstream.
fn collapse_after_delimiter(value: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(value.len());
    let mut after_delimiter = false;
    for ch in value.chars() {
        if after_delimiter && ch.is_whitespace() {
            continue;
        }
        after_delimiter = ch == delimiter;
        out.push(ch);
    }
    out
}

/// Delete every character outside the whitelist.
fn filter_whitelist(value: &str, whitelist: &CharWhitelist) -> String {
    value.chars().filter(|ch| whitelist.allows(*ch)).collect()
}

fn apply_role(value: &str, role: ColumnRole, delimiter: char) -> String {
    match role {
        ColumnRole::Iban => value.chars().filter(|ch| ch.is_alphanumeric()).collect(),
        ColumnRole::PersonName => value
            .chars()
            .map(|ch| if ch == delimiter { ' ' } else { ch })
            .collect(),
        ColumnRole::Address => compact_address(value),
        ColumnRole::TimeSuffix => canonicalize_time_suffix(value),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    Letters,
    Digits,
}

/// Collapse "letters digits letters" shaped values ("Main 12 b") into one
/// token. Anything else is left untouched.
fn compact_address(value: &str) -> String {
    let mut runs: Vec<Run> = Vec::new();
    for ch in value.chars() {
        if ch == ' ' {
            continue;
        }
        let kind = if ch.is_alphabetic() {
            Run::Letters
        } else if ch.is_ascii_digit() {
            Run::Digits
        } else {
            return value.to_string();
        };
        if runs.last() != Some(&kind) {
            runs.push(kind);
        }
    }
    if runs == [Run::Letters, Run::Digits, Run::Letters] {
        value.chars().filter(|ch| *ch != ' ').collect()
    } else {
        value.to_string()
    }
}

/// Rewrite a trailing AM/PM marker to its single-letter form and drop a
/// redundant "00" pair (with its dangling separator) directly before it:
/// "07:30:00 AM" becomes "07:30 A".
fn canonicalize_time_suffix(value: &str) -> String {
    for (marker, short) in [("AM", 'A'), ("PM", 'P')] {
        let Some(head) = value.strip_suffix(marker) else {
            continue;
        };
        let mut head = head.trim_end();
        if let Some(stripped) = head.strip_suffix("00") {
            head = stripped.trim_end_matches([':', '.']).trim_end();
        }
        if head.is_empty() {
            return short.to_string();
        }
        return format!("{head} {short}");
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabscrub_model::{ColumnSelection, ColumnSelector};

    fn single_column(cells: &[&str]) -> Table {
        Table::new(
            Some(vec!["value".to_string()]),
            cells.iter().map(|c| vec![c.to_string()]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn collapse_removes_whitespace_after_delimiter_only() {
        assert_eq!(collapse_after_delimiter("a, b,c", ','), "a,b,c");
        assert_eq!(collapse_after_delimiter("a ,b", ','), "a ,b");
        assert_eq!(collapse_after_delimiter("a,  b", ','), "a,b");
    }

    #[test]
    fn whitelist_filter_keeps_letters_digits_and_allowed_punctuation() {
        let whitelist = CharWhitelist::default();
        assert_eq!(
            filter_whitelist("Jöhn! <j@x.com>", &whitelist),
            "Jöhn j@x.com"
        );
        assert_eq!(filter_whitelist("#12-3", &whitelist), "123");
        let extended = CharWhitelist::with_extras();
        assert_eq!(filter_whitelist("#12-3", &extended), "#12-3");
    }

    #[test]
    fn trailing_strip_preserves_interior_spaces() {
        let config = CleaningConfig::default();
        let cleaned = normalize(&single_column(&["123 Main St  "]), &config).unwrap();
        assert_eq!(cleaned.rows[0][0], "123 Main St");
    }

    #[test]
    fn trailing_marker_is_stripped_after_whitespace() {
        let mut config = CleaningConfig::default();
        config.trailing_marker = Some('|');
        // Whitelist '|' so the marker survives filtering and reaches its own
        // step; interleaved markers and spaces all come off the end.
        config.whitelist.allow('|');
        let cleaned = normalize(&single_column(&["value | |"]), &config).unwrap();
        assert_eq!(cleaned.rows[0][0], "value");
    }

    #[test]
    fn trailing_marker_without_whitespace_rule_leaves_spaces() {
        let mut config = CleaningConfig::default();
        config.trailing_marker = Some('|');
        config.whitelist.allow('|');
        config.whitespace_columns = ColumnSelection::None;
        let cleaned = normalize(&single_column(&["value |"]), &config).unwrap();
        assert_eq!(cleaned.rows[0][0], "value ");
        let twice = normalize(&cleaned, &config).unwrap();
        assert_eq!(twice.rows[0][0], "value ");
    }

    #[test]
    fn iban_role_strips_everything_but_alphanumerics() {
        let mut config = CleaningConfig::default();
        config.roles = vec![(ColumnSelector::Index(0), ColumnRole::Iban)];
        let cleaned =
            normalize(&single_column(&["DE12 3456 7890 1234 5678 90"]), &config).unwrap();
        assert_eq!(cleaned.rows[0][0], "DE12345678901234567890");
    }

    #[test]
    fn person_name_role_replaces_delimiters_with_spaces() {
        let mut config = CleaningConfig::default();
        config.delimiter = ';';
        config.roles = vec![(ColumnSelector::Index(0), ColumnRole::PersonName)];
        let cleaned = normalize(&single_column(&["Doe;John"]), &config).unwrap();
        assert_eq!(cleaned.rows[0][0], "Doe John");
    }

    #[test]
    fn address_role_compacts_only_the_expected_shape() {
        assert_eq!(compact_address("Main 12 b"), "Main12b");
        assert_eq!(compact_address("Main12b"), "Main12b");
        assert_eq!(compact_address("Main Street"), "Main Street");
        assert_eq!(compact_address("12 Main 34"), "12 Main 34");
        assert_eq!(compact_address("Main 12, b"), "Main 12, b");
    }

    #[test]
    fn time_suffix_is_canonicalized() {
        assert_eq!(canonicalize_time_suffix("07:30:00 AM"), "07:30 A");
        assert_eq!(canonicalize_time_suffix("11:15 PM"), "11:15 P");
        assert_eq!(canonicalize_time_suffix("noon"), "noon");
    }

    #[test]
    fn empty_cells_are_filled_with_the_default_value() {
        let config = CleaningConfig::default();
        let cleaned = normalize(&single_column(&["", "x"]), &config).unwrap();
        assert_eq!(cleaned.rows[0][0], "NA");
        assert_eq!(cleaned.rows[1][0], "x");
    }

    #[test]
    fn whitespace_only_cells_become_default_after_strip() {
        let config = CleaningConfig::default();
        let cleaned = normalize(&single_column(&["   "]), &config).unwrap();
        assert_eq!(cleaned.rows[0][0], "NA");
    }

    #[test]
    fn rules_can_be_scoped_to_columns() {
        let table = Table::new(
            Some(vec!["keep".to_string(), "strip".to_string()]),
            vec![vec!["a  ".to_string(), "b  ".to_string()]],
        )
        .unwrap();
        let mut config = CleaningConfig::default();
        config.whitespace_columns =
            ColumnSelection::Columns(vec![ColumnSelector::Name("strip".to_string())]);
        let cleaned = normalize(&table, &config).unwrap();
        assert_eq!(cleaned.rows[0][0], "a  ");
        assert_eq!(cleaned.rows[0][1], "b");
    }

    #[test]
    fn normalization_never_changes_shape() {
        let table = Table::new(
            Some(vec!["a".to_string(), "b".to_string()]),
            vec![
                vec!["1 !".to_string(), String::new()],
                vec!["2".to_string(), "x|".to_string()],
            ],
        )
        .unwrap();
        let mut config = CleaningConfig::default();
        config.trailing_marker = Some('|');
        let cleaned = normalize(&table, &config).unwrap();
        assert_eq!(cleaned.height(), table.height());
        assert_eq!(cleaned.width(), table.width());
    }

    #[test]
    fn normalization_is_idempotent() {
        let table = Table::new(
            Some(vec![
                "name".to_string(),
                "iban".to_string(),
                "time".to_string(),
            ]),
            vec![vec![
                "Jöhn  Doe!  ".to_string(),
                "DE12 3456".to_string(),
                "07:30:00 AM".to_string(),
            ]],
        )
        .unwrap();
        let mut config = CleaningConfig::default();
        config.whitelist.allow(':');
        config.roles = vec![
            (ColumnSelector::Name("iban".to_string()), ColumnRole::Iban),
            (
                ColumnSelector::Name("time".to_string()),
                ColumnRole::TimeSuffix,
            ),
        ];
        let once = normalize(&table, &config).unwrap();
        let twice = normalize(&once, &config).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn filtered_columns_contain_only_whitelisted_characters() {
        let table = single_column(&["Jöhn <j@x.com>; {42}", "100%"]);
        let config = CleaningConfig::default();
        let cleaned = normalize(&table, &config).unwrap();
        for row in &cleaned.rows {
            for ch in row[0].chars() {
                assert!(config.whitelist.allows(ch), "unexpected {ch:?}");
            }
        }
    }
}
