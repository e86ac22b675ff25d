//! Integration tests for the clean and inspect commands.

use clap::Parser;
use std::fs;

use tabscrub_cli::cli::{CleanArgs, InspectArgs};
use tabscrub_cli::commands::{run_clean, run_inspect};

fn clean_args(args: &[&str]) -> CleanArgs {
    CleanArgs::try_parse_from(std::iter::once("clean").chain(args.iter().copied()))
        .expect("parse clean args")
}

fn inspect_args(args: &[&str]) -> InspectArgs {
    InspectArgs::try_parse_from(std::iter::once("inspect").chain(args.iter().copied()))
        .expect("parse inspect args")
}

#[test]
fn clean_writes_the_cleaned_file_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("list.csv");
    fs::write(&input, "Name;Konto\nJöhn  ;DE12 3456\n").unwrap();

    let args = clean_args(&[input.to_str().unwrap(), "--role", "Konto=iban", "--no-bom"]);
    let summary = run_clean(&args).unwrap();

    let output = summary.output.as_ref().expect("output path");
    assert_eq!(output, &dir.path().join("list.cleaned.csv"));
    let written = fs::read_to_string(output).unwrap();
    assert_eq!(written, "Name;Konto\nJöhn;DE123456\n");

    assert_eq!(summary.report.encoding, "UTF-8");
    assert_eq!(summary.report.columns["Name"].trailing_spaces_removed, 2);
    assert_eq!(summary.report.changed_cells_total, 2);
    assert_eq!(summary.original_preview.rows[0][0], "Jöhn  ");
    assert_eq!(summary.cleaned_preview.rows[0][0], "Jöhn");
}

#[test]
fn bom_is_written_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("list.csv");
    fs::write(&input, "a;b\n1;2\n").unwrap();

    let args = clean_args(&[input.to_str().unwrap()]);
    let summary = run_clean(&args).unwrap();

    let written = fs::read(summary.output.as_ref().unwrap()).unwrap();
    assert_eq!(&written[..3], &[0xEF, 0xBB, 0xBF]);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("list.csv");
    fs::write(&input, "a;b\n1;2\n").unwrap();

    let args = clean_args(&[input.to_str().unwrap(), "--dry-run"]);
    let summary = run_clean(&args).unwrap();

    assert!(summary.output.is_none());
    assert!(!dir.path().join("list.cleaned.csv").exists());
}

#[test]
fn report_json_is_written_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("list.csv");
    let report = dir.path().join("report.json");
    fs::write(&input, "a;b\nx !;y\n").unwrap();

    let args = clean_args(&[
        input.to_str().unwrap(),
        "--dry-run",
        "--report-json",
        report.to_str().unwrap(),
    ]);
    run_clean(&args).unwrap();

    let contents = fs::read_to_string(&report).unwrap();
    assert!(contents.contains("\"changed_cells\""));
    assert!(contents.contains("\"encoding\": \"UTF-8\""));
}

#[test]
fn unknown_role_keyword_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("list.csv");
    fs::write(&input, "a\n1\n").unwrap();

    let args = clean_args(&[input.to_str().unwrap(), "--role", "a=postcode"]);
    assert!(run_clean(&args).is_err());
}

#[test]
fn inspect_reports_encoding_and_shape() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("export.txt");
    // windows-1252 bytes: "Name;Ort" / "Jöhn;Köln"
    let bytes = [
        b'N', b'a', b'm', b'e', b';', b'O', b'r', b't', b'\n', b'J', 0xF6, b'h', b'n', b';', b'K',
        0xF6, b'l', b'n', b'\n',
    ];
    fs::write(&input, bytes).unwrap();

    let args = inspect_args(&[input.to_str().unwrap()]);
    let summary = run_inspect(&args).unwrap();

    assert_eq!(summary.encoding, "windows-1252");
    assert_eq!(summary.rows, 1);
    assert_eq!(summary.columns, 2);
    assert_eq!(summary.preview.rows[0][1], "Köln");
}
