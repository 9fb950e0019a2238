use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::csv_reader::truncate_cells;
use crate::error::DetectError;
use crate::model::{RawRow, RowSample};
use crate::options::{DetectOptions, SourceFormat};

/// Render a cell the way an operator sees it; whole numbers lose `.0`.
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => format!("{value:.0}"),
        other => other.to_string(),
    }
}

/// Read the first rows of the first sheet's used range.
pub(crate) fn read_workbook_sample(
    bytes: &[u8],
    options: &DetectOptions,
) -> Result<RowSample, DetectError> {
    if bytes.is_empty() {
        return Err(DetectError::EmptyFile);
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(DetectError::NoSheets)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DetectError::NoSheets)??;
    if range.is_empty() {
        return Err(DetectError::EmptyFile);
    }
    let first_row = range
        .start()
        .map_or(0, |(row, _)| usize::try_from(row).unwrap_or(0));

    let rows = range
        .rows()
        .take(options.scan_rows)
        .enumerate()
        .map(|(index, row)| {
            let cells = row.iter().map(cell_to_string).collect();
            RawRow::new(index, truncate_cells(cells, options.max_cell_chars))
        })
        .collect();

    Ok(RowSample {
        rows,
        source: SourceFormat::Workbook,
        sheet_name: Some(sheet_name),
        delimiter: None,
        first_row,
    })
}
