//! Exportación del horario a Excel
//!
//! Genera un `.xlsx` con las columnas de la clase; el fichero se puede volver
//! a subir tal cual.

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::models::{ScheduleRow, VehicleKind};

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub fn export_to_xlsx(kind: VehicleKind, rows: &[ScheduleRow]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(kind.slug())?;

    let header_format = Format::new().set_bold();
    let columns = kind.stored_columns();

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let line = idx as u32 + 1;
        for (col, name) in columns.iter().enumerate() {
            sheet.write_string(line, col as u16, row.column(kind, name).unwrap_or_default())?;
        }
    }

    workbook.save_to_buffer()
}

pub fn export_file_name(kind: VehicleKind, date: &str) -> String {
    format!("{}_schedule_{}.xlsx", kind.slug(), date)
}
