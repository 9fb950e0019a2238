use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("file is empty")]
    EmptyFile,

    #[error("could not read file: {0}")]
    Unreadable(String),

    #[error("workbook has no sheets")]
    NoSheets,

    #[error("could not detect header row in the first {scanned} row(s)")]
    HeaderNotFound { scanned: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

impl DetectError {
    /// True when the operator can fix the problem by supplying a different file.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyFile | Self::Unreadable(_) | Self::NoSheets | Self::HeaderNotFound { .. }
        )
    }
}

impl From<calamine::Error> for DetectError {
    fn from(error: calamine::Error) -> Self {
        Self::Unreadable(error.to_string())
    }
}
