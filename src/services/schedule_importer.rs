//! Importador de horarios
//!
//! Valida la hoja subida contra las columnas obligatorias de la clase,
//! normaliza las franjas, sella `last_updated` y sustituye la tabla completa
//! (o añade, si se pide expresamente). Sin columnas completas no se escribe
//! nada.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::authorization_service::can_upload;
use super::clock::stamp;
use super::spreadsheet_reader::{read_sheet, UploadedSheet};
use crate::models::{ScheduleRow, Session, VehicleKind};
use crate::repositories::{StoreError, TableStore};

/// Longitud de `HH:MM`
const SLOT_TIME_LEN: usize = 5;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Operator '{0}' is not allowed to upload schedules")]
    Forbidden(String),

    #[error("Missing columns in upload: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Failed to read uploaded file: {0}")]
    Parse(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Replace,
    Append,
}

/// Primeros 5 caracteres de una hora (descarta segundos u otros sufijos)
pub fn truncate_slot_time(value: &str) -> String {
    value.chars().take(SLOT_TIME_LEN).collect()
}

/// Convierte la hoja en filas de `kind`, o devuelve las columnas que faltan
pub fn build_rows(
    kind: VehicleKind,
    sheet: &UploadedSheet,
    now: &DateTime<FixedOffset>,
) -> Result<Vec<ScheduleRow>, ImportError> {
    let missing = sheet.missing_columns(kind.required_columns());
    if !missing.is_empty() {
        return Err(ImportError::Schema { missing });
    }

    // Todas las columnas existen: los índices están garantizados
    let index = |column: &str| sheet.column_index(column).unwrap_or_default();
    let id = index(kind.id_column());
    let label = index(kind.label_column());
    let crew = index(kind.crew_column());
    let location = index("current_location");
    let status = index("status");
    let remarks = index("remarks");
    let slot = kind
        .is_time_boxed()
        .then(|| (index("time_start"), index("time_end")));

    let last_updated = stamp(now);

    let rows = sheet
        .rows
        .iter()
        .map(|cells| ScheduleRow {
            row_id: 0,
            identifier: cells[id].clone(),
            label: cells[label].clone(),
            crew: cells[crew].clone(),
            time_start: slot.map(|(start, _)| truncate_slot_time(&cells[start])),
            time_end: slot.map(|(_, end)| truncate_slot_time(&cells[end])),
            current_location: cells[location].clone(),
            status: cells[status].clone(),
            remarks: cells[remarks].clone(),
            last_updated: last_updated.clone(),
        })
        .collect();

    Ok(rows)
}

pub struct ScheduleImporter {
    store: Arc<dyn TableStore>,
}

impl ScheduleImporter {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Importa una hoja ya leída y devuelve el número de filas escritas
    pub async fn import(
        &self,
        session: &Session,
        kind: VehicleKind,
        sheet: &UploadedSheet,
        mode: ImportMode,
        now: DateTime<FixedOffset>,
    ) -> Result<usize, ImportError> {
        authorize(session, kind)?;
        self.write(session, kind, sheet, mode, now).await
    }

    /// Lee el fichero subido e importa su primera hoja. El permiso se comprueba
    /// antes de leer el fichero.
    pub async fn import_file(
        &self,
        session: &Session,
        kind: VehicleKind,
        file_name: Option<&str>,
        bytes: &[u8],
        mode: ImportMode,
        now: DateTime<FixedOffset>,
    ) -> Result<usize, ImportError> {
        authorize(session, kind)?;
        let sheet = read_sheet(file_name, bytes).map_err(|e| ImportError::Parse(e.to_string()))?;
        self.write(session, kind, &sheet, mode, now).await
    }

    async fn write(
        &self,
        session: &Session,
        kind: VehicleKind,
        sheet: &UploadedSheet,
        mode: ImportMode,
        now: DateTime<FixedOffset>,
    ) -> Result<usize, ImportError> {
        let rows = build_rows(kind, sheet, &now)?;
        let count = rows.len();

        match mode {
            ImportMode::Replace => self.store.replace(kind, rows).await?,
            ImportMode::Append => self.store.append(kind, rows).await?,
        }

        info!(
            "📤 Horario de {} importado por {} ({:?}, {} filas)",
            kind, session.username, mode, count
        );
        Ok(count)
    }
}

fn authorize(session: &Session, kind: VehicleKind) -> Result<(), ImportError> {
    if can_upload(session) {
        return Ok(());
    }
    warn!("🚫 {} intentó subir un horario de {} sin permiso", session.username, kind);
    Err(ImportError::Forbidden(session.username.clone()))
}
