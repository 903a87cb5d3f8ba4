//! Repositorio de operadores del dashboard

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::table_store::StoreError;
use crate::models::Operator;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Operator>, StoreError>;

    /// Crea o actualiza la cuenta (clave: username)
    async fn upsert(&self, operator: &Operator) -> Result<(), StoreError>;
}

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Operator>, StoreError> {
        let operator = sqlx::query_as::<_, Operator>(
            "SELECT username, password_hash, can_upload FROM dashboard_operators WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(operator)
    }

    async fn upsert(&self, operator: &Operator) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO dashboard_operators (username, password_hash, can_upload)
            VALUES ($1, $2, $3)
            ON CONFLICT (username)
            DO UPDATE SET password_hash = EXCLUDED.password_hash, can_upload = EXCLUDED.can_upload
            "#,
        )
        .bind(&operator.username)
        .bind(&operator.password_hash)
        .bind(operator.can_upload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryAccountRepository {
    operators: RwLock<HashMap<String, Operator>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Operator>, StoreError> {
        Ok(self.operators.read().await.get(username).cloned())
    }

    async fn upsert(&self, operator: &Operator) -> Result<(), StoreError> {
        self.operators
            .write()
            .await
            .insert(operator.username.clone(), operator.clone());
        Ok(())
    }
}
