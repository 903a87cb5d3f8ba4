//! Lectura de hojas de cálculo subidas
//!
//! Convierte un fichero (xlsx/xls/ods vía calamine, o csv) en una cabecera y
//! filas de celdas como texto. Solo se lee la primera hoja; la primera fila es
//! la cabecera.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate};
use std::io::Cursor;
use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("File is empty")]
    Empty,

    #[error("Workbook has no sheets")]
    NoSheet,

    #[error("Sheet has no header row")]
    NoHeader,

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Workbook,
}

/// Hoja leída: cabecera y filas, todas del mismo ancho que la cabecera
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl UploadedSheet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .collect();
        Self { headers, rows }
    }

    /// Índice de una columna; la comparación es exacta y distingue mayúsculas
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Columnas obligatorias ausentes, en el orden en que se pidieron
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|column| self.column_index(column).is_none())
            .map(|column| column.to_string())
            .collect()
    }
}

pub fn detect_format(file_name: Option<&str>) -> SheetFormat {
    match file_name {
        Some(name) if name.to_ascii_lowercase().ends_with(".csv") => SheetFormat::Csv,
        _ => SheetFormat::Workbook,
    }
}

pub fn read_sheet(file_name: Option<&str>, bytes: &[u8]) -> Result<UploadedSheet, SheetError> {
    if bytes.is_empty() {
        return Err(SheetError::Empty);
    }

    match detect_format(file_name) {
        SheetFormat::Csv => read_csv(bytes),
        SheetFormat::Workbook => read_workbook(bytes),
    }
}

fn read_workbook(bytes: &[u8]) -> Result<UploadedSheet, SheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook.worksheet_range_at(0).ok_or(SheetError::NoSheet)??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows.next().ok_or(SheetError::NoHeader)?.iter().map(cell_text).collect();
    let body = rows.map(|row| row.iter().map(cell_text).collect()).collect();

    Ok(UploadedSheet::new(headers, body))
}

fn read_csv(bytes: &[u8]) -> Result<UploadedSheet, SheetError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(SheetError::NoHeader);
    }

    let mut body = Vec::new();
    for record in reader.records() {
        body.push(record?.iter().map(str::to_string).collect());
    }

    Ok(UploadedSheet::new(headers, body))
}

/// Texto de una celda; los enteros no llevan decimales
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_text(dt.as_f64()),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

/// Fecha serial de Excel como texto: `HH:MM:SS` para horas puras,
/// `YYYY-MM-DD HH:MM:SS` si lleva fecha.
fn excel_serial_text(serial: f64) -> String {
    let total_seconds = (serial * 86_400.0).round() as i64;
    let days = total_seconds.div_euclid(86_400);
    let seconds = total_seconds.rem_euclid(86_400);
    let time = format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    );

    if days == 0 {
        return time;
    }

    match NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|base| base.checked_add_signed(Duration::days(days))) {
        Some(date) => format!("{} {}", date.format("%Y-%m-%d"), time),
        None => serial.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn xlsx(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_read_xlsx_header_and_rows() {
        let bytes = xlsx(&[
            &["truck_id", "plate_no", "driver", "current_location", "status", "remarks"],
            &["T1", "XB1234A", "Ali", "P201", "Available", ""],
            &["T2", "XB5678B", "Bala", "On road", "Busy", "delivery"],
        ]);

        let sheet = read_sheet(Some("tipper.xlsx"), &bytes).unwrap();
        assert_eq!(sheet.headers.len(), 6);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[1][3], "On road");
        assert_eq!(sheet.rows[0][5], "");
    }

    #[test]
    fn test_numeric_cells_render_as_integers() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "truck_id").unwrap();
        sheet.write_string(0, 1, "ratio").unwrap();
        sheet.write_number(1, 0, 17.0).unwrap();
        sheet.write_number(1, 1, 0.5).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let sheet = read_sheet(None, &bytes).unwrap();
        assert_eq!(sheet.rows[0], vec!["17".to_string(), "0.5".to_string()]);
    }

    #[test]
    fn test_read_csv_with_bom() {
        let bytes = b"\xEF\xBB\xBFmachine_id,machine_name,operator\nM1,Excavator,Ahmad\n,,\nM2,Crane\n";

        let sheet = read_sheet(Some("MACHINERY.CSV"), bytes).unwrap();
        assert_eq!(sheet.headers[0], "machine_id");
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[1], vec!["M2".to_string(), "Crane".to_string(), String::new()]);
    }

    #[test]
    fn test_missing_columns_are_case_sensitive() {
        let sheet = UploadedSheet::new(
            vec!["Truck_ID".to_string(), "plate_no".to_string(), "extra".to_string()],
            vec![],
        );
        assert_eq!(
            sheet.missing_columns(&["truck_id", "plate_no", "driver"]),
            vec!["truck_id".to_string(), "driver".to_string()]
        );
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(read_sheet(Some("x.xlsx"), b""), Err(SheetError::Empty)));
        assert!(read_sheet(Some("x.xlsx"), b"definitely not a spreadsheet").is_err());
    }

    #[test]
    fn test_excel_serial_text() {
        assert_eq!(excel_serial_text(0.375), "09:00:00");
        assert_eq!(excel_serial_text(0.5 + 1.0 / 1440.0), "12:01:00");
        assert_eq!(excel_serial_text(45717.75), "2025-03-01 18:00:00");
    }
}
