//! orgplane Database: SurrealDB connection management and store
//! adapters.
//!
//! This crate provides:
//! - Connection management for the registry and tenant store
//!   ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`],
//!   [`run_tenant_migrations`])
//! - Implementations of the `orgplane-core` store traits
//!   ([`repository`])
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{registry_schema_v1, run_migrations, run_tenant_migrations};
