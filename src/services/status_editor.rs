//! Editor de estado
//!
//! Elige la fila objetivo de un vehículo y le aplica ubicación, estado y
//! observaciones. La escritura es una actualización de una sola fila,
//! condicionada al `last_updated` leído: si otra edición llegó antes, falla
//! con `Conflict` y no se escribe nada.

use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::clock::{slot_time, stamp};
use crate::models::{ScheduleRow, VehicleKind, WhereaboutsPatch};
use crate::repositories::{StoreError, TableStore};

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("No {kind} found with {column} '{identifier}'")]
    NotFound {
        kind: VehicleKind,
        column: &'static str,
        identifier: String,
    },

    #[error("Row for '{0}' was modified by another update; reload and try again")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Datos del formulario de ubicación
#[derive(Debug, Clone)]
pub struct WhereaboutsUpdate {
    pub current_location: String,
    pub status: String,
    pub remarks: String,
}

/// Índice de la fila objetivo para `identifier`, o `None` si no hay filas.
///
/// Con franjas: la primera franja que contiene `now`; si no hay, la que
/// empieza antes de entre las futuras; si tampoco, la primera fila del
/// vehículo. Sin franjas: la última fila del vehículo.
pub fn select_target(
    kind: VehicleKind,
    rows: &[ScheduleRow],
    identifier: &str,
    now_hhmm: &str,
) -> Option<usize> {
    let mut candidates = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.identifier == identifier)
        .peekable();

    candidates.peek()?;

    if !kind.is_time_boxed() {
        return candidates.last().map(|(idx, _)| idx);
    }

    let candidates: Vec<(usize, &ScheduleRow)> = candidates.collect();

    if let Some((idx, _)) = candidates
        .iter()
        .find(|(_, row)| row.start() <= now_hhmm && now_hhmm <= row.end())
    {
        return Some(*idx);
    }

    // min_by devuelve el primero ante empates: se respeta el orden de tabla
    let upcoming = candidates
        .iter()
        .filter(|(_, row)| row.start() > now_hhmm)
        .min_by(|a, b| a.1.start().cmp(b.1.start()));

    upcoming
        .or_else(|| candidates.first())
        .map(|(idx, _)| *idx)
}

pub struct StatusEditor {
    store: Arc<dyn TableStore>,
}

impl StatusEditor {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Fila que editaría `update_whereabouts` en este momento
    pub async fn target_row(
        &self,
        kind: VehicleKind,
        identifier: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<ScheduleRow, UpdateError> {
        let mut rows = self.store.load(kind).await?;
        let idx = select_target(kind, &rows, identifier, &slot_time(&now))
            .ok_or_else(|| not_found(kind, identifier))?;
        Ok(rows.swap_remove(idx))
    }

    /// Aplica la actualización a la fila objetivo y devuelve la fila resultante
    pub async fn update_whereabouts(
        &self,
        kind: VehicleKind,
        identifier: &str,
        update: WhereaboutsUpdate,
        now: DateTime<FixedOffset>,
    ) -> Result<ScheduleRow, UpdateError> {
        let mut target = self.target_row(kind, identifier, now).await?;

        let patch = WhereaboutsPatch {
            current_location: update.current_location,
            status: update.status,
            remarks: update.remarks,
            last_updated: stamp(&now),
        };

        let written = self
            .store
            .update_row(kind, target.row_id, identifier, &target.last_updated, &patch)
            .await?;

        if !written {
            warn!(
                "⚠️ Conflicto al actualizar {} '{}' (fila {})",
                kind, identifier, target.row_id
            );
            return Err(UpdateError::Conflict(identifier.to_string()));
        }

        target.apply(&patch);
        info!(
            "📍 {} '{}' actualizado: {} / {}",
            kind, identifier, target.current_location, target.status
        );
        Ok(target)
    }
}

fn not_found(kind: VehicleKind, identifier: &str) -> UpdateError {
    UpdateError::NotFound {
        kind,
        column: kind.id_column(),
        identifier: identifier.to_string(),
    }
}
