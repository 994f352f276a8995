use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDate, TimeDelta};

use super::{ImportError, ImportRow};

/// Columns an import row needs: amount, type, time, note.
const ROW_WIDTH: usize = 4;

/// Rows of every sheet in an `.xlsx`, `.xls`, `.xlsb` or `.ods` file.
///
/// The first row of each sheet is a header. Rows with fewer than four cells
/// are skipped.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<ImportRow>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ImportError::Workbook(e.to_string()))?;

    let mut rows = Vec::new();
    for sheet_name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::Workbook(format!("sheet '{sheet_name}': {e}")))?;

        for cells in range.rows().skip(1) {
            let cells: Vec<String> = trim_trailing_empty(cells).iter().map(cell_text).collect();
            if let Some(row) = ImportRow::from_cells(&cells) {
                rows.push(row);
            }
        }
    }

    if rows.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(rows)
}

/// Rows of a CSV file with a header line and the same column order as the
/// workbook form.
pub fn read_csv(bytes: &[u8]) -> Result<Vec<ImportRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(ToString::to_string).collect();
        if let Some(row) = ImportRow::from_cells(&cells) {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(rows)
}

impl ImportRow {
    fn from_cells(cells: &[String]) -> Option<Self> {
        if cells.len() < ROW_WIDTH {
            return None;
        }
        Some(Self {
            amount: cells[0].clone(),
            kind: cells[1].clone(),
            time: cells[2].clone(),
            note: cells[3].clone(),
        })
    }
}

// A sheet range is as wide as its widest row; short rows come back padded.
fn trim_trailing_empty(cells: &[Data]) -> &[Data] {
    let len = cells
        .iter()
        .rposition(|c| !matches!(c, Data::Empty))
        .map_or(0, |i| i + 1);
    &cells[..len]
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => format!("{}", n.round() as i64),
        Data::Int(n) => n.to_string(),
        Data::DateTime(dt) => excel_serial_to_text(dt.as_f64()),
        other => other.to_string(),
    }
}

/// Excel serial date (1900 system) as a naive `YYYY-MM-DDTHH:MM:SS`.
///
/// Serials outside chrono's range come back empty so the row falls under the
/// invalid-date policy.
fn excel_serial_to_text(serial: f64) -> String {
    if !serial.is_finite() {
        return String::new();
    }
    let seconds = (serial * 86_400.0).round() as i64;
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .zip(TimeDelta::try_seconds(seconds))
        .and_then(|(epoch, offset)| epoch.checked_add_signed(offset))
        .map(|at| at.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_default()
}
