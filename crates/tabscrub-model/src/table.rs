use crate::error::{CleanError, Result};

/// An in-memory delimited table: ordered rows of string cells.
///
/// Every row has the same length, and `headers` (when present) has that
/// length too. The parser enforces the invariant; [`Table::new`] re-checks it
/// so table surgery cannot silently produce ragged data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Option<Vec<String>>, rows: Vec<Vec<String>>) -> Result<Self> {
        let width = headers
            .as_ref()
            .map(Vec::len)
            .or_else(|| rows.first().map(Vec::len))
            .unwrap_or(0);
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(CleanError::Parse {
                    row: idx,
                    expected: width,
                    found: row.len(),
                });
            }
        }
        Ok(Self { headers, rows })
    }

    pub fn width(&self) -> usize {
        self.headers
            .as_ref()
            .map(Vec::len)
            .or_else(|| self.rows.first().map(Vec::len))
            .unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Header name for a column, or a positional fallback for unnamed columns.
    pub fn column_label(&self, idx: usize) -> String {
        match self.header_name(idx) {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("column {idx}"),
        }
    }

    pub fn header_name(&self, idx: usize) -> Option<&str> {
        self.headers.as_ref().and_then(|h| h.get(idx)).map(String::as_str)
    }

    /// Zero-based position of a named column, matched case-sensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .as_ref()?
            .iter()
            .position(|header| header == name)
    }

    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row[idx].as_str())
    }

    /// True when every data cell in the column is empty or whitespace-only.
    pub fn column_is_blank(&self, idx: usize) -> bool {
        self.column(idx).all(|cell| cell.trim().is_empty())
    }

    /// Remove one column, keeping headers in step with the rows.
    pub fn remove_column(&mut self, idx: usize) {
        if let Some(headers) = self.headers.as_mut() {
            headers.remove(idx);
        }
        for row in &mut self.rows {
            row.remove(idx);
        }
    }
}
