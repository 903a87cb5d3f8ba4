//! Store en memoria
//!
//! Se usa cuando no hay `DATABASE_URL` y en los tests. Mismo contrato que el
//! store de PostgreSQL: `row_id` creciente por tabla, replace destructivo.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::table_store::{StoreError, TableStore};
use crate::models::{ScheduleRow, VehicleKind, WhereaboutsPatch};

#[derive(Debug, Default)]
struct MemoryTable {
    rows: Vec<ScheduleRow>,
    next_row_id: i64,
}

impl MemoryTable {
    fn push(&mut self, mut row: ScheduleRow) {
        self.next_row_id += 1;
        row.row_id = self.next_row_id;
        self.rows.push(row);
    }
}

#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: RwLock<HashMap<VehicleKind, MemoryTable>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn load(&self, kind: VehicleKind) -> Result<Vec<ScheduleRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.get(&kind).map(|t| t.rows.clone()).unwrap_or_default())
    }

    async fn replace(&self, kind: VehicleKind, rows: Vec<ScheduleRow>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(kind).or_default();
        // next_row_id sigue creciendo: un replace nunca reutiliza ids
        table.rows.clear();
        let count = rows.len();
        for row in rows {
            table.push(row);
        }
        debug!("🗂️ Tabla {} reemplazada en memoria ({} filas)", kind.table_name(), count);
        Ok(())
    }

    async fn append(&self, kind: VehicleKind, rows: Vec<ScheduleRow>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(kind).or_default();
        for row in rows {
            table.push(row);
        }
        Ok(())
    }

    async fn update_row(
        &self,
        kind: VehicleKind,
        row_id: i64,
        identifier: &str,
        expected_last_updated: &str,
        patch: &WhereaboutsPatch,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(&kind)
            .and_then(|t| t.rows.iter_mut().find(|r| r.row_id == row_id));

        match row {
            Some(row) if row.identifier == identifier && row.last_updated == expected_last_updated => {
                row.apply(patch);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
