use csv::{ReaderBuilder, StringRecord};
use encoding_rs::{UTF_8, WINDOWS_1252};

use crate::error::DetectError;
use crate::model::{RawRow, RowSample};
use crate::options::{DetectOptions, SourceFormat};

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];
const TEXT_CHECK_CHARS: usize = 64 * 1024;

/// Decode file bytes, honouring a BOM and falling back to Windows-1252.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }

    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

fn looks_binary(text: &str) -> bool {
    let mut total = 0_usize;
    let mut control = 0_usize;
    let mut replacement = 0_usize;

    for ch in text.chars().take(TEXT_CHECK_CHARS) {
        total += 1;
        if ch == '\u{FFFD}' {
            replacement += 1;
        } else if ch.is_control() && !matches!(ch, '\n' | '\r' | '\t') {
            control += 1;
        }
    }

    total > 0 && (control * 10 > total || replacement * 8 > total)
}

fn count_outside_quotes(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Pick the delimiter whose per-line count is high and steady.
pub(crate) fn sniff_delimiter(lines: &[&str]) -> u8 {
    let lines = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();
    if lines.is_empty() {
        return b',';
    }

    let mut best_delimiter = b',';
    let mut best_score = 0.0_f64;

    for &delimiter in &CANDIDATE_DELIMITERS {
        let counts = lines
            .iter()
            .map(|line| count_outside_quotes(line, delimiter) as f64)
            .collect::<Vec<_>>();
        let mean = counts.iter().sum::<f64>() / counts.len() as f64;
        if mean == 0.0 {
            continue;
        }

        let variance =
            counts.iter().map(|count| (count - mean).powi(2)).sum::<f64>() / counts.len() as f64;
        let score = mean / (1.0 + variance.sqrt());
        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

/// Split one physical line into cells, honouring quotes.
pub(crate) fn split_csv_line(line: &str, delimiter: u8) -> Result<Vec<String>, DetectError> {
    if line.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Ok(Vec::new());
    }

    Ok(record.iter().map(ToString::to_string).collect())
}

pub(crate) fn truncate_cells(cells: Vec<String>, max_chars: usize) -> Vec<String> {
    cells
        .into_iter()
        .map(|cell| {
            if cell.chars().count() > max_chars {
                cell.chars().take(max_chars).collect()
            } else {
                cell
            }
        })
        .collect()
}

pub(crate) fn read_csv_sample(
    bytes: &[u8],
    options: &DetectOptions,
) -> Result<RowSample, DetectError> {
    let text = decode_text(bytes);
    if text.trim().is_empty() {
        return Err(DetectError::EmptyFile);
    }
    if looks_binary(&text) {
        return Err(DetectError::Unreadable(
            "content does not look like delimited text".to_string(),
        ));
    }

    let lines = text.lines().take(options.scan_rows).collect::<Vec<_>>();
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| sniff_delimiter(&lines));

    let rows = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let cells = split_csv_line(line, delimiter)?;
            Ok(RawRow::new(index, truncate_cells(cells, options.max_cell_chars)))
        })
        .collect::<Result<Vec<_>, DetectError>>()?;

    Ok(RowSample {
        rows,
        source: SourceFormat::Csv,
        sheet_name: None,
        delimiter: Some(delimiter),
        first_row: 0,
    })
}
