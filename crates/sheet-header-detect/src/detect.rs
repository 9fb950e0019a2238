use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::DetectError;
use crate::model::{DetectionResult, RowProfile, RowSample};
use crate::profile::profile_rows;
use crate::warning::{DetectionWarning, WarningCode};

/// Column count shared by the header and data rows.
///
/// Widths seen at least twice win over one-off widths; within either group
/// the widest is taken, then the most frequent.
pub(crate) fn candidate_width(profiles: &[RowProfile]) -> Option<usize> {
    let mut frequency: BTreeMap<usize, usize> = BTreeMap::new();
    for profile in profiles {
        *frequency.entry(profile.column_count).or_default() += 1;
    }

    let widest = |min_count: usize| {
        frequency
            .iter()
            .filter(|&(_, &count)| count >= min_count)
            .max_by_key(|&(&width, &count)| (width, count))
            .map(|(&width, _)| width)
    };

    widest(2).or_else(|| widest(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HeaderChoice {
    pub profile: RowProfile,
    pub numeric: bool,
}

impl HeaderChoice {
    fn text(profile: RowProfile) -> Self {
        Self {
            profile,
            numeric: false,
        }
    }
}

pub(crate) fn choose_header_row(profiles: &[RowProfile]) -> Option<HeaderChoice> {
    let first = *profiles.first()?;
    let Some(width) = candidate_width(profiles) else {
        return Some(HeaderChoice::text(first));
    };
    let Some(position) = profiles
        .iter()
        .position(|profile| profile.column_count == width)
    else {
        return Some(HeaderChoice::text(first));
    };

    let matched = profiles[position];
    if matched.is_mostly_text {
        return Some(HeaderChoice::text(matched));
    }

    // A text row directly above that covers at least half the width is a
    // header with blank trailing cells, not a title.
    let previous = position
        .checked_sub(1)
        .map(|index| profiles[index])
        .filter(|profile| profile.is_mostly_text);
    if let Some(previous) = previous
        && previous.column_count * 2 >= width
    {
        return Some(HeaderChoice::text(previous));
    }

    if let Some(text_row) = profiles[position + 1..]
        .iter()
        .find(|profile| profile.column_count == width && profile.is_mostly_text)
    {
        return Some(HeaderChoice::text(*text_row));
    }

    if let Some(previous) = previous {
        return Some(HeaderChoice::text(previous));
    }

    Some(HeaderChoice {
        profile: matched,
        numeric: true,
    })
}

/// Names that occur more than once, in order of first appearance.
pub(crate) fn duplicate_names(columns: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for column in columns {
        *counts.entry(column.as_str()).or_default() += 1;
    }

    let mut duplicates: Vec<String> = Vec::new();
    for column in columns {
        if counts.get(column.as_str()).is_some_and(|&count| count > 1)
            && !duplicates.contains(column)
        {
            duplicates.push(column.clone());
        }
    }
    duplicates
}

/// Locate the header row in a sample and return its column names.
pub fn detect_header_row(sample: &RowSample) -> Result<DetectionResult, DetectError> {
    let profiles = profile_rows(&sample.rows);
    let choice = choose_header_row(&profiles).ok_or(DetectError::HeaderNotFound {
        scanned: sample.rows.len(),
    })?;
    let header_index = choice.profile.index;

    debug!(
        header_index,
        width = choice.profile.column_count,
        profiled = profiles.len(),
        "header row selected"
    );

    let columns = sample
        .rows
        .iter()
        .find(|row| row.index == header_index)
        .map(|row| {
            row.non_empty_cells()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    if columns.is_empty() {
        return Err(DetectError::HeaderNotFound {
            scanned: sample.rows.len(),
        });
    }

    let mut warnings = Vec::new();
    if header_index > 0 {
        warnings.push(DetectionWarning::rows_skipped(header_index));
    }
    if choice.numeric {
        warnings.push(DetectionWarning::new(
            WarningCode::NumericHeader,
            format!("header row {} looks like data; verify the column names", header_index + 1),
        ));
    }
    let duplicates = duplicate_names(&columns);
    if !duplicates.is_empty() {
        warnings.push(DetectionWarning::duplicate_columns(&duplicates));
    }

    Ok(DetectionResult {
        header_row_index: header_index,
        source_row: sample.first_row + header_index + 1,
        columns,
        warnings,
        rows_scanned: sample.rows.len(),
        source: sample.source,
        sheet_name: sample.sheet_name.clone(),
        delimiter: sample.delimiter.map(char::from),
    })
}
