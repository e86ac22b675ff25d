//! Cleaning configuration.
//!
//! One immutable [`CleaningConfig`] value is constructed before the pipeline
//! runs and passed by reference into every stage; no component reads ambient
//! state. Every rule variant that differs between deployments (whitelist
//! contents, trailing marker, column roles, merge mode) is a field here, not
//! a forked code path.

use std::collections::BTreeSet;
use std::fmt;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::error::{CleanError, Result};
use crate::table::Table;

/// Addresses one column, by zero-based position or by header name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

impl ColumnSelector {
    /// Parse a CLI-style selector: digits mean a position, anything else a header name.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<usize>() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Name(raw.trim().to_string()),
        }
    }

    pub fn resolve(&self, table: &Table) -> Result<usize> {
        match self {
            Self::Index(idx) => {
                if *idx < table.width() {
                    Ok(*idx)
                } else {
                    Err(CleanError::Config(format!(
                        "column index {idx} is out of bounds for a table with {} columns",
                        table.width()
                    )))
                }
            }
            Self::Name(name) => table.column_index(name).ok_or_else(|| {
                CleanError::Config(format!("no column named {name:?} in the table"))
            }),
        }
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(idx) => write!(f, "{idx}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Which columns a normalization rule applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSelection {
    #[default]
    All,
    None,
    Columns(Vec<ColumnSelector>),
}

impl ColumnSelection {
    /// Per-column applicability mask, resolved against the table once.
    pub fn mask(&self, table: &Table) -> Result<Vec<bool>> {
        let width = table.width();
        match self {
            Self::All => Ok(vec![true; width]),
            Self::None => Ok(vec![false; width]),
            Self::Columns(selectors) => {
                let mut mask = vec![false; width];
                for selector in selectors {
                    mask[selector.resolve(table)?] = true;
                }
                Ok(mask)
            }
        }
    }
}

/// Latin-extended letters the whitelist always treats as letters, alongside
/// ASCII. Field exports this tool sees are German/western-European address
/// and banking lists.
pub const ACCENTED_LETTERS: &[char] = &[
    'Ä', 'ä', 'Ö', 'ö', 'Ü', 'ü', 'ß', 'Á', 'á', 'À', 'à', 'Â', 'â', 'É', 'é', 'È', 'è', 'Ê', 'ê',
    'Ë', 'ë', 'Í', 'í', 'Ì', 'ì', 'Î', 'î', 'Ï', 'ï', 'Ó', 'ó', 'Ò', 'ò', 'Ô', 'ô', 'Ú', 'ú', 'Ù',
    'ù', 'Û', 'û', 'Ñ', 'ñ', 'Ç', 'ç', 'Å', 'å', 'Ø', 'ø', 'Æ', 'æ',
];

/// Characters the whitelist filter keeps.
///
/// Letters (ASCII plus [`ACCENTED_LETTERS`]) and digits are always kept; the
/// punctuation set is deployment-specific and therefore configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharWhitelist {
    pub punctuation: BTreeSet<char>,
}

impl Default for CharWhitelist {
    fn default() -> Self {
        Self {
            punctuation: ['.', ',', ';', '@', ' '].into_iter().collect(),
        }
    }
}

impl CharWhitelist {
    /// The default set extended with the optional `# - _ &` characters.
    pub fn with_extras() -> Self {
        let mut whitelist = Self::default();
        whitelist.punctuation.extend(['#', '-', '_', '&']);
        whitelist
    }

    pub fn allow(&mut self, ch: char) {
        self.punctuation.insert(ch);
    }

    pub fn allows(&self, ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ACCENTED_LETTERS.contains(&ch) || self.punctuation.contains(&ch)
    }
}

/// Caller-assigned normalization role for a column. Roles are never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    /// Bank-account identifier: strip everything that is not a letter or digit.
    Iban,
    /// Person name: file delimiters inside the value become spaces.
    PersonName,
    /// Street-style value: collapse `letters digits letters` runs into one token.
    Address,
    /// Clock value with a trailing AM/PM marker to canonicalize.
    TimeSuffix,
}

impl ColumnRole {
    pub fn from_keyword(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "iban" => Some(Self::Iban),
            "name" => Some(Self::PersonName),
            "address" => Some(Self::Address),
            "time" => Some(Self::TimeSuffix),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Iban => "iban",
            Self::PersonName => "name",
            Self::Address => "address",
            Self::TimeSuffix => "time",
        }
    }
}

/// What to do when the delimiter yields rows of unequal length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaggedRows {
    /// Fail the run with the offending row index.
    #[default]
    Fail,
    /// Pad short rows (and a short header) with empty cells to the widest row.
    Pad,
}

/// Output quoting policy, mapped onto the `csv` crate's quote styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotePolicy {
    /// Quote only cells that need it (embedded delimiter, quote, newline).
    #[default]
    Minimal,
    Always,
    Never,
}

/// Explicit column merge: the first named column receives the separator-join
/// of all named columns; the rest are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSpec {
    pub columns: Vec<ColumnSelector>,
    pub separator: String,
    /// Only join rows whose final cell is empty (the signature an unescaped
    /// delimiter leaves after shifting a row right). Off means unconditional.
    pub only_shifted_rows: bool,
}

impl MergeSpec {
    pub fn new(columns: Vec<ColumnSelector>) -> Self {
        Self {
            columns,
            separator: ", ".to_string(),
            only_shifted_rows: false,
        }
    }
}

/// Immutable configuration for one cleaning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningConfig {
    pub delimiter: char,
    pub has_header: bool,
    /// Value written into cells that are still empty after normalization.
    pub default_value: String,
    pub ragged_rows: RaggedRows,
    /// Columns subject to the whitespace rules (delimiter-collapse, trailing strip).
    pub whitespace_columns: ColumnSelection,
    /// Columns subject to the character whitelist filter.
    pub filter_columns: ColumnSelection,
    pub whitelist: CharWhitelist,
    /// Marker character stripped from cell ends (e.g. `|`), if any.
    pub trailing_marker: Option<char>,
    pub marker_columns: ColumnSelection,
    pub roles: Vec<(ColumnSelector, ColumnRole)>,
    pub merge: Option<MergeSpec>,
    /// Attempt the unnamed-column repair heuristic.
    pub repair_unnamed: bool,
    pub drop_empty_columns: bool,
    pub quoting: QuotePolicy,
    /// WHATWG encoding label for the serialized output.
    pub output_encoding: String,
    /// Prepend a UTF-8 byte-order mark to the output.
    pub output_bom: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
            default_value: "NA".to_string(),
            ragged_rows: RaggedRows::default(),
            whitespace_columns: ColumnSelection::All,
            filter_columns: ColumnSelection::All,
            whitelist: CharWhitelist::default(),
            trailing_marker: None,
            marker_columns: ColumnSelection::All,
            roles: Vec::new(),
            merge: None,
            repair_unnamed: true,
            drop_empty_columns: false,
            quoting: QuotePolicy::default(),
            output_encoding: "utf-8".to_string(),
            output_bom: true,
        }
    }
}

impl CleaningConfig {
    /// Table-independent checks. Run before parsing.
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(CleanError::Config(format!(
                "delimiter {:?} must be a single ASCII character",
                self.delimiter
            )));
        }
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(CleanError::Config(format!(
                "delimiter {:?} collides with quoting or record separators",
                self.delimiter
            )));
        }
        if let Some(merge) = &self.merge
            && merge.columns.len() < 2
        {
            return Err(CleanError::Config(
                "merge needs at least two column selectors".to_string(),
            ));
        }
        if self.resolve_output_encoding().is_none() {
            return Err(CleanError::Config(format!(
                "unknown output encoding label {:?}",
                self.output_encoding
            )));
        }
        Ok(())
    }

    /// Selector bound checks against the parsed table. Run before any mutation.
    pub fn validate_against(&self, table: &Table) -> Result<()> {
        self.whitespace_columns.mask(table)?;
        self.filter_columns.mask(table)?;
        self.marker_columns.mask(table)?;
        let mut role_columns = BTreeSet::new();
        for (selector, role) in &self.roles {
            let idx = selector.resolve(table)?;
            if !role_columns.insert(idx) {
                return Err(CleanError::Config(format!(
                    "column {} has more than one role (last: {})",
                    table.column_label(idx),
                    role.keyword()
                )));
            }
        }
        if let Some(merge) = &self.merge {
            for selector in &merge.columns {
                selector.resolve(table)?;
            }
        }
        Ok(())
    }

    /// The encoding the serializer writes, per the WHATWG output-encoding
    /// mapping (UTF-16 labels fall back to UTF-8).
    pub fn resolve_output_encoding(&self) -> Option<&'static Encoding> {
        Encoding::for_label(self.output_encoding.as_bytes()).map(Encoding::output_encoding)
    }
}
