use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    RowsSkipped,
    DuplicateColumns,
    NumericHeader,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionWarning {
    pub code: WarningCode,
    pub message: String,
}

impl DetectionWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn rows_skipped(count: usize) -> Self {
        Self::new(
            WarningCode::RowsSkipped,
            format!("skipped {count} row(s) before the header row"),
        )
    }

    #[must_use]
    pub fn duplicate_columns(duplicates: &[String]) -> Self {
        Self::new(
            WarningCode::DuplicateColumns,
            format!("duplicate column names: {}", duplicates.join(", ")),
        )
    }
}
