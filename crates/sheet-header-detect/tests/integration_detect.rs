mod common;

use std::path::{Path, PathBuf};
use std::process::Command;

use sheet_header_detect::{
    ColumnMapping, DetectError, DetectOptions, SourceFormat, WarningCode,
    compare_column_mappings, detect_headers_from_path, read_row_sample,
};
use tempfile::tempdir;

#[test]
fn detects_headers_below_report_banner() {
    let dir = tempdir().expect("tempdir should be created");
    let input = common::write_fixture(
        dir.path(),
        "consumers.csv",
        common::consumer_export(40).as_bytes(),
    );

    let result =
        detect_headers_from_path(&input, &DetectOptions::default()).expect("detection succeeds");

    assert_eq!(result.header_row_index, 3);
    assert_eq!(result.source_row, 4);
    assert_eq!(
        result.columns,
        vec!["Consumer No", "Name", "Area", "Route", "Cylinders"]
    );
    assert_eq!(result.rows_scanned, 30);
    assert_eq!(result.warnings[0].code, WarningCode::RowsSkipped);
}

fn workbook_fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/consumers.xlsx")
}

#[test]
fn detects_headers_in_first_sheet_of_workbook() {
    let result = detect_headers_from_path(&workbook_fixture(), &DetectOptions::default())
        .expect("detection succeeds");

    // The used range starts at A2, so the title is relative row 0.
    assert_eq!(result.header_row_index, 2);
    assert_eq!(result.source_row, 4);
    assert_eq!(result.columns, vec!["Consumer No", "Name", "Cylinders"]);
    assert_eq!(result.source, SourceFormat::Workbook);
    assert_eq!(result.sheet_name.as_deref(), Some("Consumers"));
    assert_eq!(result.delimiter, None);
    assert!(
        result
            .warning()
            .is_some_and(|message| message.contains("skipped 2 row(s) before the header row"))
    );
}

#[test]
fn workbook_numbers_are_rendered_without_fraction() {
    let bytes = std::fs::read(workbook_fixture()).expect("fixture should be read");
    let sample = read_row_sample(&bytes, SourceFormat::Workbook, &DetectOptions::default())
        .expect("sample");

    assert_eq!(sample.first_row, 1);
    assert_eq!(sample.rows.len(), 5);
    assert!(sample.rows[1].is_blank());
    assert_eq!(sample.rows[3].cells, vec!["1001", "Asha", "2"]);
}

#[test]
fn cli_reports_sheet_row_for_workbook() {
    let output = Command::new(env!("CARGO_BIN_EXE_sheetheaders"))
        .args(["detect", "-i", &workbook_fixture().to_string_lossy()])
        .output()
        .expect("CLI should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("header row: 4 (sheet 'Consumers')"),
        "stdout: {stdout}"
    );
    assert!(stdout.contains("Consumer No"), "stdout: {stdout}");
}

#[test]
fn detects_semicolon_export_with_quoted_cells() {
    let dir = tempdir().expect("tempdir should be created");
    let input = common::write_fixture(
        dir.path(),
        "routes.txt",
        b"Route;Driver;\"Areas; served\"\nR-01;Mohan;\"North; East\"\nR-02;Irfan;South\n",
    );

    let result =
        detect_headers_from_path(&input, &DetectOptions::default()).expect("detection succeeds");

    assert_eq!(result.delimiter, Some(';'));
    assert_eq!(result.columns, vec!["Route", "Driver", "Areas; served"]);
    assert!(result.warning().is_none());
}

#[test]
fn workbook_format_rejects_plain_text() {
    let dir = tempdir().expect("tempdir should be created");
    let input = common::write_fixture(dir.path(), "fake.xlsx", b"Name,Phone\nAsha,1\n");

    let err = detect_headers_from_path(&input, &DetectOptions::default())
        .expect_err("text is not a workbook");
    assert!(matches!(err, DetectError::Unreadable(_)), "error: {err}");

    let options = DetectOptions {
        format: Some(SourceFormat::Csv),
        ..DetectOptions::default()
    };
    let result = detect_headers_from_path(&input, &options).expect("forced csv succeeds");
    assert_eq!(result.columns, vec!["Name", "Phone"]);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().expect("tempdir should be created");
    let err = detect_headers_from_path(&dir.path().join("absent.csv"), &DetectOptions::default())
        .expect_err("missing file");
    assert!(matches!(err, DetectError::Io(_)));
}

#[test]
fn detected_columns_feed_the_comparator() {
    let dir = tempdir().expect("tempdir should be created");
    let input = common::write_fixture(
        dir.path(),
        "consumers.csv",
        common::consumer_export(5).as_bytes(),
    );
    let result =
        detect_headers_from_path(&input, &DetectOptions::default()).expect("detection succeeds");

    let saved: ColumnMapping = [
        ("consumer_no", "Consumer No"),
        ("name", "Name"),
        ("mobile", "Mobile"),
    ]
    .into_iter()
    .map(|(field, column)| (field.to_string(), column.to_string()))
    .collect();

    let comparison = compare_column_mappings(&result.columns, &saved);
    assert!(comparison.has_changes);
    assert_eq!(comparison.missing_columns, vec!["Mobile"]);
    assert_eq!(comparison.new_columns, vec!["Area", "Route", "Cylinders"]);
}

#[test]
fn cli_exits_with_code_2_for_empty_file() {
    let dir = tempdir().expect("tempdir should be created");
    let input = common::write_fixture(dir.path(), "empty.csv", b"");

    let status = Command::new(env!("CARGO_BIN_EXE_sheetheaders"))
        .args(["detect", "-i", &input.to_string_lossy()])
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(2));
}

#[test]
fn cli_compare_exits_with_code_3_on_drift() {
    let dir = tempdir().expect("tempdir should be created");
    let input = common::write_fixture(dir.path(), "stock.csv", b"Product,Qty,Rate\nLPG 14.2,10,903\n");
    let mapping = common::write_fixture(
        dir.path(),
        "mapping.json",
        br#"{"product": "Product", "quantity": "Quantity"}"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_sheetheaders"))
        .args([
            "compare",
            "-i",
            &input.to_string_lossy(),
            "--mapping",
            &mapping.to_string_lossy(),
        ])
        .output()
        .expect("CLI should run");

    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Quantity"), "stdout: {stdout}");
}
