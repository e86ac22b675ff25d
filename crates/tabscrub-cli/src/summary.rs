//! Terminal rendering of cleaning results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabscrub_model::CleaningReport;

use crate::types::{CleanRunSummary, InspectSummary, Preview};

pub fn print_summary(summary: &CleanRunSummary) {
    println!("Input: {}", summary.input.display());
    match &summary.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run)"),
    }
    if let Some(path) = &summary.report_json {
        println!("Report: {}", path.display());
    }

    print_preview("Original preview", &summary.original_preview);
    print_preview("Cleaned preview", &summary.cleaned_preview);
    print_overview(&summary.report);
    print_column_table(&summary.report);
    print_warnings(&summary.report);
}

pub fn print_inspect(summary: &InspectSummary) {
    println!("Input: {}", summary.input.display());
    println!(
        "Encoding: {}{}",
        summary.encoding,
        if summary.bom { " (BOM)" } else { "" }
    );
    println!("Size: {} bytes", summary.bytes);
    println!("Shape: {} rows x {} columns", summary.rows, summary.columns);
    print_preview("Preview", &summary.preview);
}

fn print_preview(title: &str, preview: &Preview) {
    println!();
    println!("{title}:");
    let mut table = Table::new();
    apply_table_style(&mut table);
    if let Some(headers) = &preview.headers {
        table.set_header(headers.iter().map(|name| header_cell(name)).collect::<Vec<_>>());
    }
    for row in &preview.rows {
        table.add_row(row.iter().map(Cell::new).collect::<Vec<_>>());
    }
    println!("{table}");
    if preview.total_rows > preview.rows.len() {
        println!(
            "({} of {} rows shown)",
            preview.rows.len(),
            preview.total_rows
        );
    }
}

fn print_overview(report: &CleaningReport) {
    println!();
    println!("Cleaning summary:");
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![
        header_cell("Metric"),
        header_cell("Before"),
        header_cell("After"),
    ]);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Rows"),
        Cell::new(report.rows_before),
        Cell::new(report.rows_after),
    ]);
    table.add_row(vec![
        Cell::new("Columns"),
        Cell::new(report.columns_before),
        Cell::new(report.columns_after),
    ]);
    table.add_row(vec![
        Cell::new("Size (bytes)"),
        Cell::new(report.bytes_before),
        Cell::new(report.bytes_after),
    ]);
    println!("{table}");

    let mut counters = Table::new();
    apply_table_style(&mut counters);
    counters.set_header(vec![header_cell("Counter"), header_cell("Value")]);
    align_column(&mut counters, 1, CellAlignment::Right);
    counters.add_row(vec![Cell::new("Encoding"), Cell::new(&report.encoding)]);
    counters.add_row(vec![
        Cell::new("Changed cells"),
        count_cell(report.changed_cells_total),
    ]);
    counters.add_row(vec![
        Cell::new("Trailing whitespace removed"),
        count_cell(report.spaces_removed_total),
    ]);
    counters.add_row(vec![
        Cell::new("Columns dropped"),
        count_cell(report.columns_dropped as u64),
    ]);
    counters.add_row(vec![
        Cell::new("Empty columns removed"),
        count_cell(report.empty_columns_removed as u64),
    ]);
    counters.add_row(vec![
        Cell::new("Columns merged away"),
        count_cell(report.merged_columns as u64),
    ]);
    let removed: String = report.removed_characters().into_iter().collect();
    counters.add_row(vec![
        Cell::new("Removed characters"),
        if removed.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(format!("{removed:?}"))
        },
    ]);
    println!("{counters}");
}

fn print_column_table(report: &CleaningReport) {
    if report.columns.is_empty() {
        return;
    }
    println!();
    println!("Per column:");
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Changed cells"),
        header_cell("Trailing whitespace"),
        header_cell("Removed characters"),
    ]);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (label, column) in &report.columns {
        let removed: String = column.removed_chars.iter().collect();
        table.add_row(vec![
            Cell::new(label).fg(Color::Blue).add_attribute(Attribute::Bold),
            count_cell(column.changed_cells),
            count_cell(column.trailing_spaces_removed),
            if removed.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(format!("{removed:?}"))
            },
        ]);
    }
    println!("{table}");
}

fn print_warnings(report: &CleaningReport) {
    if !report.has_warnings() {
        return;
    }
    println!();
    println!("Warnings:");
    for warning in &report.warnings {
        println!("- {} (column {}): {}", warning.label, warning.column, warning.message);
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(value: u64) -> Cell {
    if value > 0 {
        Cell::new(value)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(0)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
