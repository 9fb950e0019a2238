use crate::model::{RawRow, RowProfile};

pub(crate) fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim().replace(',', "");
    trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Profile a row, or `None` when every cell is blank.
pub(crate) fn profile_row(row: &RawRow) -> Option<RowProfile> {
    let mut text_count = 0;
    let mut numeric_count = 0;

    for cell in row.non_empty_cells() {
        if is_numeric(cell) {
            numeric_count += 1;
        } else {
            text_count += 1;
        }
    }

    let column_count = text_count + numeric_count;
    if column_count == 0 {
        return None;
    }

    Some(RowProfile {
        index: row.index,
        column_count,
        text_count,
        numeric_count,
        is_mostly_text: text_count > numeric_count,
    })
}

pub(crate) fn profile_rows(rows: &[RawRow]) -> Vec<RowProfile> {
    rows.iter().filter_map(profile_row).collect()
}
