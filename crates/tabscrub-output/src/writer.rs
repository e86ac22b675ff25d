//! Rendering a [`Table`] back to delimited bytes.
//!
//! The contract is the round trip: parsing the produced bytes under the same
//! delimiter, encoding, and header mode yields an equal table, provided the
//! quoting policy escapes delimiter-containing cells.

use csv::{QuoteStyle, WriterBuilder};
use encoding_rs::UTF_8;
use tracing::debug;

use tabscrub_model::{CleanError, CleaningConfig, QuotePolicy, Result, Table};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

fn quote_style(policy: QuotePolicy) -> QuoteStyle {
    match policy {
        QuotePolicy::Minimal => QuoteStyle::Necessary,
        QuotePolicy::Always => QuoteStyle::Always,
        QuotePolicy::Never => QuoteStyle::Never,
    }
}

/// Serialize the table with the configured delimiter, quoting policy, and
/// output encoding.
pub fn serialize(table: &Table, config: &CleaningConfig) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(config.delimiter as u8)
        .quote_style(quote_style(config.quoting))
        .from_writer(Vec::new());
    if let Some(headers) = &table.headers {
        writer
            .write_record(headers)
            .map_err(|error| CleanError::Message(format!("csv write: {error}")))?;
    }
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|error| CleanError::Message(format!("csv write: {error}")))?;
    }
    let buffer = writer
        .into_inner()
        .map_err(|error| CleanError::Message(format!("csv flush: {error}")))?;
    let text = String::from_utf8(buffer)
        .map_err(|error| CleanError::Message(format!("csv output not utf-8: {error}")))?;

    let encoding = config.resolve_output_encoding().ok_or_else(|| {
        CleanError::Config(format!(
            "unknown output encoding label {:?}",
            config.output_encoding
        ))
    })?;
    let (encoded, _, had_unmappable) = encoding.encode(&text);
    if had_unmappable {
        return Err(CleanError::Message(format!(
            "output encoding {} cannot represent every character in the table",
            encoding.name()
        )));
    }

    let mut bytes = Vec::with_capacity(encoded.len() + UTF8_BOM.len());
    if config.output_bom && encoding == UTF_8 {
        bytes.extend_from_slice(&UTF8_BOM);
    }
    bytes.extend_from_slice(&encoded);
    debug!(
        bytes = bytes.len(),
        encoding = encoding.name(),
        "output serialized"
    );
    Ok(bytes)
}
