use serde::Serialize;

use crate::options::SourceFormat;
use crate::warning::DetectionWarning;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub index: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    #[must_use]
    pub fn new(index: usize, cells: Vec<String>) -> Self {
        Self { index, cells }
    }

    pub fn non_empty_cells(&self) -> impl Iterator<Item = &str> {
        self.cells
            .iter()
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.non_empty_cells().next().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowProfile {
    pub index: usize,
    pub column_count: usize,
    pub text_count: usize,
    pub numeric_count: usize,
    pub is_mostly_text: bool,
}

/// Rows read from the head of a file, before detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSample {
    pub rows: Vec<RawRow>,
    pub source: SourceFormat,
    pub sheet_name: Option<String>,
    pub delimiter: Option<u8>,
    /// Zero-based position of `rows[0]` in the source (sheet used-range start).
    pub first_row: usize,
}

impl RowSample {
    /// Build a sample from already split rows, indexed from zero.
    #[must_use]
    pub fn from_cells(source: SourceFormat, rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(index, cells)| RawRow::new(index, cells))
                .collect(),
            source,
            sheet_name: None,
            delimiter: None,
            first_row: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub header_row_index: usize,
    /// One-based row number of the header as shown by a spreadsheet or editor.
    pub source_row: usize,
    pub columns: Vec<String>,
    pub warnings: Vec<DetectionWarning>,
    pub rows_scanned: usize,
    pub source: SourceFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
}

impl DetectionResult {
    /// All advisory messages joined into one line, if there are any.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        if self.warnings.is_empty() {
            return None;
        }

        Some(
            self.warnings
                .iter()
                .map(|warning| warning.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
