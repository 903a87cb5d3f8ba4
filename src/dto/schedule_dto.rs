use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::models::{ScheduleRow, StatusSet, VehicleKind};
use crate::services::availability_view::ScheduleEntry;
use crate::services::ImportMode;
use crate::utils::validation::validate_not_empty;

// Query del dashboard: `?vehicles=V1,V2`
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub vehicles: Option<String>,
}

// Query de subida: `?mode=replace|append`
#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub mode: ImportMode,
}

// Formulario de ubicación/estado
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWhereaboutsRequest {
    #[validate(length(max = 200))]
    #[serde(default)]
    pub current_location: String,
    #[validate(custom = "validate_not_empty")]
    #[serde(default)]
    pub status: String,
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub remarks: String,
}

// Fila con los nombres de columna de su clase
#[derive(Debug, Serialize)]
pub struct RowView {
    pub row_id: i64,
    #[serde(flatten)]
    pub columns: Map<String, Value>,
}

impl RowView {
    pub fn new(kind: VehicleKind, row: &ScheduleRow) -> Self {
        Self {
            row_id: row.row_id,
            columns: row.to_columns(kind),
        }
    }
}

// Fila del horario con sus marcas
#[derive(Debug, Serialize)]
pub struct ScheduleEntryResponse {
    #[serde(flatten)]
    pub row: RowView,
    pub active_now: bool,
    pub available_now: bool,
}

impl ScheduleEntryResponse {
    pub fn new(kind: VehicleKind, entry: &ScheduleEntry<'_>) -> Self {
        Self {
            row: RowView::new(kind, entry.row),
            active_now: entry.active_now,
            available_now: entry.available_now,
        }
    }
}

// Vista completa del dashboard de una clase
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub kind: VehicleKind,
    pub display_name: String,
    pub now: String,
    pub columns: Vec<&'static str>,
    pub statuses: StatusSet,
    pub vehicles: Vec<String>,
    pub available_now: Vec<RowView>,
    pub schedule: Vec<ScheduleEntryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
}

impl DashboardResponse {
    pub fn empty(kind: VehicleKind, now: String, statuses: StatusSet) -> Self {
        Self {
            kind,
            display_name: kind.display_name().to_string(),
            now,
            columns: kind.stored_columns(),
            statuses,
            vehicles: Vec::new(),
            available_now: Vec::new(),
            schedule: Vec::new(),
            notice: None,
            load_error: None,
        }
    }
}

// Resultado de una subida
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub kind: VehicleKind,
    pub mode: ImportMode,
    pub rows_imported: usize,
}

// Descripción de una clase para el frontend
#[derive(Debug, Serialize)]
pub struct KindInfo {
    pub kind: VehicleKind,
    pub display_name: &'static str,
    pub time_boxed: bool,
    pub required_columns: &'static [&'static str],
    pub statuses: StatusSet,
}
