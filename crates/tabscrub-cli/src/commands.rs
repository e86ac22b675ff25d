//! Command implementations: wire CLI arguments into the pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use tabscrub_ingest::{detect, parse_table};
use tabscrub_model::{
    CharWhitelist, CleaningConfig, ColumnRole, ColumnSelection, ColumnSelector, MergeSpec,
    QuotePolicy, RaggedRows,
};
use tabscrub_report::write_report_json;

use crate::cli::{CleanArgs, InspectArgs, QuoteArg};
use crate::types::{CleanRunSummary, InspectSummary, Preview};

pub fn run_clean(args: &CleanArgs) -> Result<CleanRunSummary> {
    let config = build_config(args)?;
    let bytes = fs::read(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;

    let outcome = tabscrub_core::run(bytes.clone(), &config)
        .with_context(|| format!("clean {}", args.input.display()))?;

    // Display-only: the pipeline owns (and discards) its original table, so
    // the before-preview comes from a fresh parse of the same bytes.
    let original = parse_table(&detect(bytes), &config)?;
    let original_preview = Preview::head(&original, args.preview_rows);
    let cleaned_preview = Preview::head(&outcome.cleaned, args.preview_rows);

    let output = if args.dry_run {
        None
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.input));
        fs::write(&path, &outcome.output)
            .with_context(|| format!("write {}", path.display()))?;
        Some(path)
    };

    if let Some(path) = &args.report_json {
        write_report_json(path, &outcome.report)
            .with_context(|| format!("write report {}", path.display()))?;
    }

    Ok(CleanRunSummary {
        input: args.input.clone(),
        output,
        report_json: args.report_json.clone(),
        original_preview,
        cleaned_preview,
        report: outcome.report,
    })
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectSummary> {
    let mut config = CleaningConfig::default();
    config.delimiter = args.delimiter;
    config.has_header = !args.no_header;
    if args.pad_ragged {
        config.ragged_rows = RaggedRows::Pad;
    }
    config.validate()?;

    let bytes = fs::read(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let byte_len = bytes.len();
    let guess = detect(bytes);
    let encoding = guess.label().to_string();
    let bom = guess.has_bom();
    let table = parse_table(&guess, &config)
        .with_context(|| format!("parse {}", args.input.display()))?;

    Ok(InspectSummary {
        input: args.input.clone(),
        encoding,
        bom,
        bytes: byte_len,
        rows: table.height(),
        columns: table.width(),
        preview: Preview::head(&table, args.preview_rows),
    })
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("output");
    let extension = input
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("csv");
    input.with_file_name(format!("{stem}.cleaned.{extension}"))
}

fn build_config(args: &CleanArgs) -> Result<CleaningConfig> {
    let mut config = CleaningConfig::default();
    config.delimiter = args.delimiter;
    config.has_header = !args.no_header;
    config.default_value = args.default_value.clone();
    if args.pad_ragged {
        config.ragged_rows = RaggedRows::Pad;
    }
    config.whitespace_columns = parse_selection(&args.strip_whitespace)?;
    config.filter_columns = parse_selection(&args.filter_columns)?;
    if args.allow_extras {
        config.whitelist = CharWhitelist::with_extras();
    }
    if let Some(extra) = &args.allow {
        for ch in extra.chars() {
            config.whitelist.allow(ch);
        }
    }
    config.trailing_marker = args.trailing_marker;
    config.roles = parse_roles(&args.roles)?;
    if let Some(raw) = &args.merge {
        let mut merge = MergeSpec::new(parse_selectors(raw));
        merge.separator = args.merge_separator.clone();
        merge.only_shifted_rows = args.merge_shifted_only;
        config.merge = Some(merge);
    }
    config.repair_unnamed = !args.no_repair_unnamed;
    config.drop_empty_columns = args.drop_empty_columns;
    config.quoting = match args.quote {
        QuoteArg::Minimal => QuotePolicy::Minimal,
        QuoteArg::Always => QuotePolicy::Always,
        QuoteArg::Never => QuotePolicy::Never,
    };
    config.output_encoding = args.output_encoding.clone();
    config.output_bom = !args.no_bom;
    config.validate()?;
    Ok(config)
}

fn parse_selectors(raw: &str) -> Vec<ColumnSelector> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ColumnSelector::parse)
        .collect()
}

fn parse_selection(raw: &str) -> Result<ColumnSelection> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "all" => Ok(ColumnSelection::All),
        "none" => Ok(ColumnSelection::None),
        _ => {
            let selectors = parse_selectors(raw);
            if selectors.is_empty() {
                bail!("empty column selection {raw:?}");
            }
            Ok(ColumnSelection::Columns(selectors))
        }
    }
}

fn parse_roles(raw: &[String]) -> Result<Vec<(ColumnSelector, ColumnRole)>> {
    let mut roles = Vec::with_capacity(raw.len());
    for entry in raw {
        let Some((column, role)) = entry.split_once('=') else {
            bail!("role {entry:?} is not of the form COLUMN=ROLE");
        };
        let Some(role) = ColumnRole::from_keyword(role) else {
            bail!("unknown role {role:?} (expected iban, name, address, or time)");
        };
        roles.push((ColumnSelector::parse(column), role));
    }
    Ok(roles)
}
