//! Delimited-text parsing into a [`Table`].
//!
//! Cells stay untouched strings: no trimming (the diff engine must still see
//! trailing whitespace), no type inference, no missing-value fill (that
//! happens at the end of normalization so originally-empty cells remain
//! observable).

use csv::ReaderBuilder;
use tracing::debug;

use tabscrub_model::{CleanError, CleaningConfig, RaggedRows, Result, Table};

use crate::encoding::EncodingGuess;

/// Decode and split the input into rows and columns on the configured
/// delimiter, treating the first row as headers when configured.
pub fn parse_table(guess: &EncodingGuess, config: &CleaningConfig) -> Result<Table> {
    let (text, _, had_errors) = guess.encoding().decode(guess.bytes());
    if had_errors {
        return Err(CleanError::Decode {
            encoding: guess.label().to_string(),
        });
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    // Row indices refer to the original file order, fully-empty records skipped.
    let mut raw_rows: Vec<(usize, Vec<String>)> = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|error| CleanError::Message(format!("csv parse: {error}")))?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        raw_rows.push((idx, row));
    }

    if raw_rows.is_empty() {
        return Table::new(config.has_header.then(Vec::new), Vec::new());
    }

    let mut headers = None;
    if config.has_header {
        let (_, header_row) = raw_rows.remove(0);
        headers = Some(header_row);
    }

    let expected = headers
        .as_ref()
        .map(Vec::len)
        .or_else(|| raw_rows.first().map(|(_, row)| row.len()))
        .unwrap_or(0);

    match config.ragged_rows {
        RaggedRows::Fail => {
            for (idx, row) in &raw_rows {
                if row.len() != expected {
                    return Err(CleanError::Parse {
                        row: *idx,
                        expected,
                        found: row.len(),
                    });
                }
            }
        }
        RaggedRows::Pad => {
            let width = raw_rows
                .iter()
                .map(|(_, row)| row.len())
                .max()
                .unwrap_or(expected)
                .max(expected);
            if let Some(headers) = headers.as_mut() {
                headers.resize(width, String::new());
            }
            for (_, row) in &mut raw_rows {
                row.resize(width, String::new());
            }
        }
    }

    let rows: Vec<Vec<String>> = raw_rows.into_iter().map(|(_, row)| row).collect();
    let table = Table::new(headers, rows)?;
    debug!(
        rows = table.height(),
        columns = table.width(),
        encoding = guess.label(),
        "input parsed"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::detect;

    fn parse(bytes: &[u8], config: &CleaningConfig) -> Result<Table> {
        parse_table(&detect(bytes.to_vec()), config)
    }

    #[test]
    fn parses_headers_and_rows() {
        let config = CleaningConfig::default();
        let table = parse(b"name,email\nJ.Doe,a@b.com\n", &config).unwrap();
        assert_eq!(
            table.headers.as_deref(),
            Some(&["name".to_string(), "email".to_string()][..])
        );
        assert_eq!(table.rows, vec![vec!["J.Doe".to_string(), "a@b.com".to_string()]]);
    }

    #[test]
    fn preserves_trailing_whitespace_in_cells() {
        let mut config = CleaningConfig::default();
        config.delimiter = ';';
        config.has_header = false;
        let table = parse("Jöhn  ;123 Main St  ; a@b.com\n".as_bytes(), &config).unwrap();
        assert_eq!(table.rows[0][0], "Jöhn  ");
        assert_eq!(table.rows[0][1], "123 Main St  ");
        assert_eq!(table.rows[0][2], " a@b.com");
    }

    #[test]
    fn skips_fully_empty_records() {
        let config = CleaningConfig::default();
        let table = parse(b"a,b\n1,2\n,\n3,4\n", &config).unwrap();
        assert_eq!(table.height(), 2);
    }

    #[test]
    fn ragged_row_fails_with_row_index() {
        let config = CleaningConfig::default();
        let result = parse(b"a,b\n1,2,3\n", &config);
        assert!(matches!(
            result,
            Err(CleanError::Parse {
                row: 1,
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn ragged_rows_pad_to_widest_and_pad_header() {
        let mut config = CleaningConfig::default();
        config.ragged_rows = RaggedRows::Pad;
        let table = parse(b"a,b\n1,2,3\n4\n", &config).unwrap();
        assert_eq!(table.width(), 3);
        assert_eq!(
            table.headers.as_deref(),
            Some(&["a".to_string(), "b".to_string(), String::new()][..])
        );
        assert_eq!(table.rows[1], vec!["4".to_string(), String::new(), String::new()]);
    }

    #[test]
    fn decodes_windows_1252_input() {
        let mut config = CleaningConfig::default();
        config.delimiter = ';';
        // "Jöhn;Müller" in windows-1252
        let bytes = [b'J', 0xF6, b'h', b'n', b';', b'M', 0xFC, b'l', b'l', b'e', b'r', b'\n'];
        let table = parse(&bytes, &config).unwrap();
        assert_eq!(
            table.headers.as_deref(),
            Some(&["Jöhn".to_string(), "Müller".to_string()][..])
        );
    }

    #[test]
    fn headerless_mode_keeps_first_row_as_data() {
        let mut config = CleaningConfig::default();
        config.has_header = false;
        let table = parse(b"1,2\n3,4\n", &config).unwrap();
        assert!(table.headers.is_none());
        assert_eq!(table.height(), 2);
    }
}
