//! Abstracción del store de tablas
//!
//! Una tabla por clase de vehículo. Las filas se devuelven siempre en orden de
//! tabla (`row_id` ascendente).

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ScheduleRow, VehicleKind, WhereaboutsPatch};

/// Errores del store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait TableStore: Send + Sync {
    /// Todas las filas de la tabla, en orden
    async fn load(&self, kind: VehicleKind) -> Result<Vec<ScheduleRow>, StoreError>;

    /// Descarta todas las filas y escribe las dadas
    async fn replace(&self, kind: VehicleKind, rows: Vec<ScheduleRow>) -> Result<(), StoreError>;

    /// Añade filas al final sin tocar las existentes
    async fn append(&self, kind: VehicleKind, rows: Vec<ScheduleRow>) -> Result<(), StoreError>;

    /// Actualiza una única fila si sigue perteneciendo a `identifier` y su
    /// `last_updated` sigue siendo `expected_last_updated`.
    ///
    /// Devuelve `false` si la fila ya no existe o cambió entre la lectura y la escritura.
    /// Los `row_id` no se reutilizan entre cargas, así que una fila sustituida
    /// nunca coincide con el `row_id` leído antes.
    async fn update_row(
        &self,
        kind: VehicleKind,
        row_id: i64,
        identifier: &str,
        expected_last_updated: &str,
        patch: &WhereaboutsPatch,
    ) -> Result<bool, StoreError>;
}
