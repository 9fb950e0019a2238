use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

/// Number of leading physical rows inspected when looking for the header.
pub const HEADER_SCAN_ROWS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    /// Guess the format from a file name extension.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|value| value.to_str())?
            .to_ascii_lowercase();

        match extension.as_str() {
            "csv" | "txt" | "tsv" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        match spec.trim().to_ascii_lowercase().as_str() {
            "csv" | "text" => Ok(Self::Csv),
            "workbook" | "excel" | "xlsx" | "xls" | "ods" => Ok(Self::Workbook),
            other => Err(format!(
                "unknown source format '{other}', expected csv or workbook"
            )),
        }
    }
}

/// Parse a delimiter given as a single ASCII character or the word `tab`.
pub fn parse_delimiter(spec: &str) -> Result<u8, String> {
    if spec.eq_ignore_ascii_case("tab") || spec == "\\t" {
        return Ok(b'\t');
    }

    let mut chars = spec.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii() && ch != '"' && ch != '\n' && ch != '\r' => {
            Ok(ch as u8)
        }
        _ => Err(format!(
            "invalid delimiter '{spec}', expected a single ASCII character"
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectOptions {
    /// Source format; resolved from the file name when absent.
    pub format: Option<SourceFormat>,
    /// CSV delimiter; sniffed from the sample when absent.
    pub delimiter: Option<u8>,
    pub scan_rows: usize,
    /// Cells longer than this are truncated before profiling.
    pub max_cell_chars: usize,
}

impl DetectOptions {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.scan_rows == 0 {
            return Err("scan_rows must be at least 1".to_string());
        }
        if self.max_cell_chars == 0 {
            return Err("max_cell_chars must be at least 1".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub fn resolve_format(&self, file_name: Option<&str>) -> SourceFormat {
        self.format
            .or_else(|| file_name.and_then(SourceFormat::from_file_name))
            .unwrap_or(SourceFormat::Csv)
    }
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            format: None,
            delimiter: None,
            scan_rows: HEADER_SCAN_ROWS,
            max_cell_chars: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DetectOptions, SourceFormat, parse_delimiter};
    use std::str::FromStr;

    #[test]
    fn format_from_extension_is_case_insensitive() {
        assert_eq!(
            SourceFormat::from_file_name("Consumers.XLSX"),
            Some(SourceFormat::Workbook)
        );
        assert_eq!(
            SourceFormat::from_file_name("routes.csv"),
            Some(SourceFormat::Csv)
        );
        assert_eq!(SourceFormat::from_file_name("notes"), None);
    }

    #[test]
    fn explicit_format_wins_over_file_name() {
        let options = DetectOptions {
            format: Some(SourceFormat::Workbook),
            ..DetectOptions::default()
        };
        assert_eq!(
            options.resolve_format(Some("upload.csv")),
            SourceFormat::Workbook
        );
        assert_eq!(
            DetectOptions::default().resolve_format(None),
            SourceFormat::Csv
        );
    }

    #[test]
    fn reject_unknown_format() {
        let err = SourceFormat::from_str("pdf").expect_err("pdf is not a tabular format");
        assert!(err.contains("unknown source format"));
    }

    #[test]
    fn parse_delimiters() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("\"").is_err());
    }
}
