//! Repositorios
//!
//! Acceso a las tablas de horarios y a las cuentas de operador, con una
//! implementación PostgreSQL y otra en memoria.

pub mod account_repository;
pub mod memory_table_store;
pub mod pg_table_store;
pub mod table_store;

pub use account_repository::{AccountRepository, MemoryAccountRepository, PgAccountRepository};
pub use memory_table_store::MemoryTableStore;
pub use pg_table_store::PgTableStore;
pub use table_store::{StoreError, TableStore};
