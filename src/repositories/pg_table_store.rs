//! Store de tablas sobre PostgreSQL
//!
//! Los nombres de tabla y columna salen de `VehicleKind` (constantes), nunca
//! de la entrada del usuario; los valores siempre van como parámetros.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{debug, info};

use super::table_store::{StoreError, TableStore};
use crate::models::{ScheduleRow, VehicleKind, WhereaboutsPatch};

/// Filas por INSERT; PostgreSQL admite como máximo 65535 parámetros por sentencia
const INSERT_BATCH: usize = 1000;

#[derive(Clone)]
pub struct PgTableStore {
    pool: PgPool,
}

impl PgTableStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn select_sql(kind: VehicleKind) -> String {
        let (time_start, time_end) = if kind.is_time_boxed() {
            ("time_start", "time_end")
        } else {
            ("NULL::text AS time_start", "NULL::text AS time_end")
        };

        format!(
            "SELECT row_id, {} AS identifier, {} AS label, {} AS crew, {}, {}, \
             current_location, status, remarks, last_updated \
             FROM {} ORDER BY row_id",
            kind.id_column(),
            kind.label_column(),
            kind.crew_column(),
            time_start,
            time_end,
            kind.table_name(),
        )
    }

    fn update_sql(kind: VehicleKind) -> String {
        format!(
            "UPDATE {} SET current_location = $1, status = $2, remarks = $3, last_updated = $4 \
             WHERE row_id = $5 AND last_updated = $6 AND {} = $7",
            kind.table_name(),
            kind.id_column(),
        )
    }

    async fn insert_rows(
        tx: &mut Transaction<'_, Postgres>,
        kind: VehicleKind,
        rows: &[ScheduleRow],
    ) -> Result<(), sqlx::Error> {
        let columns = kind.stored_columns();

        for chunk in rows.chunks(INSERT_BATCH) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
                "INSERT INTO {} ({}) ",
                kind.table_name(),
                columns.join(", ")
            ));

            builder.push_values(chunk, |mut values, row| {
                for column in &columns {
                    values.push_bind(row.column(kind, column).unwrap_or_default().to_string());
                }
            });

            builder.build().execute(&mut **tx).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl TableStore for PgTableStore {
    async fn load(&self, kind: VehicleKind) -> Result<Vec<ScheduleRow>, StoreError> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&Self::select_sql(kind))
            .fetch_all(&self.pool)
            .await?;

        debug!("📥 {} filas leídas de {}", rows.len(), kind.table_name());
        Ok(rows)
    }

    async fn replace(&self, kind: VehicleKind, rows: Vec<ScheduleRow>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Sin RESTART IDENTITY: los row_id de la carga anterior no se reutilizan
        sqlx::query(&format!("TRUNCATE TABLE {}", kind.table_name()))
            .execute(&mut *tx)
            .await?;
        Self::insert_rows(&mut tx, kind, &rows).await?;

        tx.commit().await?;
        info!("💾 Tabla {} reemplazada ({} filas)", kind.table_name(), rows.len());
        Ok(())
    }

    async fn append(&self, kind: VehicleKind, rows: Vec<ScheduleRow>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        Self::insert_rows(&mut tx, kind, &rows).await?;
        tx.commit().await?;

        info!("💾 {} filas añadidas a {}", rows.len(), kind.table_name());
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
        let sql = Self::update_sql(kind);

        let result = sqlx::query(&sql)
            .bind(&patch.current_location)
            .bind(&patch.status)
            .bind(&patch.remarks)
            .bind(&patch.last_updated)
            .bind(row_id)
            .bind(expected_last_updated)
            .bind(identifier)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
