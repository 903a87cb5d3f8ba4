//! Vista de disponibilidad
//!
//! Derivaciones puras sobre las filas cargadas: nunca escriben en el store.
//! Las franjas se comparan como texto `HH:MM`, válido porque el formato es de
//! 24 horas con ceros a la izquierda.

use std::collections::HashSet;

use crate::models::{ScheduleRow, StatusSet, VehicleKind};

/// Fila del horario del día con sus marcas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry<'a> {
    pub row: &'a ScheduleRow,
    pub active_now: bool,
    pub available_now: bool,
}

/// `time_start <= now <= time_end`, ambos extremos incluidos
pub fn in_window(row: &ScheduleRow, now_hhmm: &str) -> bool {
    row.start() <= now_hhmm && now_hhmm <= row.end()
}

/// Parte horaria del predicado: la franja contiene `now` (solo clases con franja)
pub fn is_active_now(kind: VehicleKind, row: &ScheduleRow, now_hhmm: &str) -> bool {
    kind.is_time_boxed() && in_window(row, now_hhmm)
}

pub fn is_available_now(
    kind: VehicleKind,
    statuses: &StatusSet,
    row: &ScheduleRow,
    now_hhmm: &str,
) -> bool {
    if !statuses.is_available(&row.status) {
        return false;
    }
    !kind.is_time_boxed() || in_window(row, now_hhmm)
}

/// Filas disponibles ahora, en orden de tabla
pub fn compute_availability<'a>(
    kind: VehicleKind,
    statuses: &StatusSet,
    rows: &'a [ScheduleRow],
    now_hhmm: &str,
) -> Vec<&'a ScheduleRow> {
    rows.iter()
        .filter(|row| is_available_now(kind, statuses, row, now_hhmm))
        .collect()
}

/// Horario del día: filtrado opcional por identificadores, ordenado por
/// identificador (y por inicio de franja si aplica). El orden es estable, así
/// que los empates conservan el orden de la tabla.
pub fn todays_schedule<'a>(
    kind: VehicleKind,
    statuses: &StatusSet,
    rows: &'a [ScheduleRow],
    identifiers: Option<&HashSet<String>>,
    now_hhmm: &str,
) -> Vec<ScheduleEntry<'a>> {
    let mut entries: Vec<ScheduleEntry<'a>> = rows
        .iter()
        .filter(|row| identifiers.map_or(true, |ids| ids.contains(&row.identifier)))
        .map(|row| ScheduleEntry {
            row,
            active_now: is_active_now(kind, row, now_hhmm),
            available_now: is_available_now(kind, statuses, row, now_hhmm),
        })
        .collect();

    if kind.is_time_boxed() {
        entries.sort_by(|a, b| {
            (a.row.identifier.as_str(), a.row.start()).cmp(&(b.row.identifier.as_str(), b.row.start()))
        });
    } else {
        entries.sort_by(|a, b| a.row.identifier.cmp(&b.row.identifier));
    }

    entries
}

/// Identificadores distintos en orden de primera aparición
pub fn identifiers(rows: &[ScheduleRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(row.identifier.as_str()))
        .map(|row| row.identifier.clone())
        .collect()
}
