//! Modelo de fila de horario
//!
//! Las tres tablas comparten la misma forma; `VehicleKind` traduce los campos
//! genéricos a los nombres de columna de cada clase.

use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;

use super::vehicle_kind::VehicleKind;

/// Fila de una tabla de horarios
///
/// `row_id` lo asigna el store y refleja el orden de la tabla; vale 0 en las
/// filas que todavía no se han guardado.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, FromRow)]
pub struct ScheduleRow {
    pub row_id: i64,
    pub identifier: String,
    pub label: String,
    pub crew: String,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub current_location: String,
    pub status: String,
    pub remarks: String,
    pub last_updated: String,
}

/// Cambios que aplica el editor de estado sobre una única fila
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereaboutsPatch {
    pub current_location: String,
    pub status: String,
    pub remarks: String,
    pub last_updated: String,
}

impl ScheduleRow {
    /// Inicio de franja como texto; vacío si la fila no tiene franja
    pub fn start(&self) -> &str {
        self.time_start.as_deref().unwrap_or("")
    }

    pub fn end(&self) -> &str {
        self.time_end.as_deref().unwrap_or("")
    }

    /// Aplica un parche de ubicación/estado
    pub fn apply(&mut self, patch: &WhereaboutsPatch) {
        self.current_location = patch.current_location.clone();
        self.status = patch.status.clone();
        self.remarks = patch.remarks.clone();
        self.last_updated = patch.last_updated.clone();
    }

    /// Valor de una columna por su nombre en la tabla de `kind`
    pub fn column(&self, kind: VehicleKind, column: &str) -> Option<&str> {
        let value = match column {
            c if c == kind.id_column() => self.identifier.as_str(),
            c if c == kind.label_column() => self.label.as_str(),
            c if c == kind.crew_column() => self.crew.as_str(),
            "time_start" if kind.is_time_boxed() => self.start(),
            "time_end" if kind.is_time_boxed() => self.end(),
            "current_location" => self.current_location.as_str(),
            "status" => self.status.as_str(),
            "remarks" => self.remarks.as_str(),
            "last_updated" => self.last_updated.as_str(),
            _ => return None,
        };
        Some(value)
    }

    /// Serializa la fila con los nombres de columna de su clase
    pub fn to_columns(&self, kind: VehicleKind) -> Map<String, Value> {
        kind.stored_columns()
            .into_iter()
            .filter_map(|column| {
                self.column(kind, column)
                    .map(|value| (column.to_string(), Value::String(value.to_string())))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> ScheduleRow {
        ScheduleRow {
            row_id: 4,
            identifier: "M1".to_string(),
            label: "Excavator".to_string(),
            crew: "Ahmad".to_string(),
            current_location: "P201".to_string(),
            status: "Available".to_string(),
            remarks: String::new(),
            last_updated: "2025-03-01 08:00".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_columns_use_kind_names() {
        let columns = machine().to_columns(VehicleKind::Machinery);
        assert_eq!(columns["machine_id"], "M1");
        assert_eq!(columns["machine_name"], "Excavator");
        assert_eq!(columns["operator"], "Ahmad");
        assert!(!columns.contains_key("time_start"));
        assert!(!columns.contains_key("plate_no"));
        assert_eq!(columns.len(), 7);
    }

    #[test]
    fn test_apply_patch_keeps_identity() {
        let mut row = machine();
        row.apply(&WhereaboutsPatch {
            current_location: "Dormitory".to_string(),
            status: "Busy".to_string(),
            remarks: "lunch".to_string(),
            last_updated: "2025-03-01 12:00".to_string(),
        });
        assert_eq!(row.row_id, 4);
        assert_eq!(row.identifier, "M1");
        assert_eq!(row.current_location, "Dormitory");
        assert_eq!(row.last_updated, "2025-03-01 12:00");
    }
}
