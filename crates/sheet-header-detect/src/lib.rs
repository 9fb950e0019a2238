mod csv_reader;
mod detect;
mod error;
mod mapping;
mod model;
mod options;
mod profile;
mod warning;
mod workbook_reader;

use std::path::Path;

use crate::csv_reader::read_csv_sample;
use crate::workbook_reader::read_workbook_sample;

pub use detect::detect_header_row;
pub use error::DetectError;
pub use mapping::{
    ColumnMapping, FieldDefinition, MappingComparison, MappingSuggestion,
    compare_column_mappings, suggest_mapping, validate_mapping,
};
pub use model::{DetectionResult, RawRow, RowProfile, RowSample};
pub use options::{DetectOptions, HEADER_SCAN_ROWS, SourceFormat, parse_delimiter};
pub use warning::{DetectionWarning, WarningCode};

/// Read the head of a file into rows without running detection.
pub fn read_row_sample(
    bytes: &[u8],
    format: SourceFormat,
    options: &DetectOptions,
) -> Result<RowSample, DetectError> {
    options.validate().map_err(DetectError::InvalidOption)?;
    if bytes.is_empty() {
        return Err(DetectError::EmptyFile);
    }

    match format {
        SourceFormat::Csv => read_csv_sample(bytes, options),
        SourceFormat::Workbook => read_workbook_sample(bytes, options),
    }
}

/// Detect the header row of an in-memory upload.
///
/// `file_name` is only used to pick the format when `options.format` is unset.
pub fn detect_headers_from_bytes(
    bytes: &[u8],
    file_name: Option<&str>,
    options: &DetectOptions,
) -> Result<DetectionResult, DetectError> {
    let format = options.resolve_format(file_name);
    let sample = read_row_sample(bytes, format, options)?;
    detect_header_row(&sample)
}

pub fn detect_headers_from_path(
    path: &Path,
    options: &DetectOptions,
) -> Result<DetectionResult, DetectError> {
    let bytes = std::fs::read(path)?;
    let file_name = path.file_name().and_then(|name| name.to_str());
    detect_headers_from_bytes(&bytes, file_name, options)
}

#[cfg(test)]
mod tests {
    use super::{DetectError, DetectOptions, SourceFormat, detect_headers_from_bytes};

    #[test]
    fn empty_upload_is_rejected_before_reading() {
        let err = detect_headers_from_bytes(&[], Some("consumers.xlsx"), &DetectOptions::default())
            .expect_err("empty upload");
        assert!(matches!(err, DetectError::EmptyFile));
        assert!(err.is_input_error());
        assert_eq!(err.to_string(), "file is empty");
    }

    #[test]
    fn zero_scan_rows_is_an_invalid_option() {
        let options = DetectOptions {
            scan_rows: 0,
            ..DetectOptions::default()
        };
        let err = detect_headers_from_bytes(b"a,b\n", None, &options).expect_err("invalid");
        assert!(matches!(err, DetectError::InvalidOption(_)));
        assert!(!err.is_input_error());
    }

    #[test]
    fn report_title_rows_are_skipped_in_csv() {
        let csv = "Consumer Master Report\nGenerated: 2024-10-01 09:30\n\n\
                   Consumer No,Name,Route,Phone\n\
                   1001,Asha,R-01,9800000001\n\
                   1002,Ravi,R-02,9800000002\n";
        let result = detect_headers_from_bytes(csv.as_bytes(), Some("master.csv"), &DetectOptions::default())
            .expect("detect");

        assert_eq!(result.source, SourceFormat::Csv);
        assert_eq!(result.header_row_index, 3);
        assert_eq!(result.columns, vec!["Consumer No", "Name", "Route", "Phone"]);
        assert_eq!(result.delimiter, Some(','));
        assert!(
            result
                .warning()
                .is_some_and(|warning| warning.contains("skipped 3 row(s)"))
        );
    }
}
