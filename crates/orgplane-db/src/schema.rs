//! Schema definitions and migration runner for SurrealDB.
//!
//! The registry uses SCHEMAFULL tables whose unique indexes back the
//! name/slug/email conflict rules. The tenant store keeps a catalog of its
//! collections; the collections themselves are SCHEMALESS and defined at
//! runtime.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static REGISTRY_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "registry_schema",
    sql: REGISTRY_SCHEMA_V1,
}];

static TENANT_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "collection_catalog",
    sql: TENANT_SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Registry schema v1
// -----------------------------------------------------------------------

const REGISTRY_SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string \
    ASSERT string::len($value) >= 1 AND string::len($value) <= 200;
DEFINE FIELD slug ON TABLE organization TYPE string;
DEFINE FIELD collection_name ON TABLE organization TYPE string;
DEFINE FIELD tenant_store_name ON TABLE organization TYPE string;
DEFINE FIELD admin_id ON TABLE organization TYPE option<string>;
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE option<datetime>;
DEFINE INDEX idx_organization_name ON TABLE organization \
    COLUMNS name UNIQUE;
DEFINE INDEX idx_organization_slug ON TABLE organization \
    COLUMNS slug UNIQUE;

-- =======================================================================
-- Administrators (one per organization)
-- =======================================================================
DEFINE TABLE administrator SCHEMAFULL;
DEFINE FIELD email ON TABLE administrator TYPE string;
DEFINE FIELD password_hash ON TABLE administrator TYPE string;
DEFINE FIELD org_id ON TABLE administrator TYPE string;
DEFINE FIELD created_at ON TABLE administrator TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_administrator_email ON TABLE administrator \
    COLUMNS email UNIQUE;
DEFINE INDEX idx_administrator_org ON TABLE administrator \
    COLUMNS org_id;
";

// -----------------------------------------------------------------------
// Tenant store schema v1
// -----------------------------------------------------------------------

const TENANT_SCHEMA_V1: &str = "\
DEFINE TABLE _collection SCHEMAFULL;
DEFINE FIELD name ON TABLE _collection TYPE string;
DEFINE FIELD created_at ON TABLE _collection TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_collection_name ON TABLE _collection \
    COLUMNS name UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending registry migrations against the given client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    apply(db, "registry", REGISTRY_MIGRATIONS).await
}

/// Run all pending tenant store migrations against the given client.
pub async fn run_tenant_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    apply(db, "tenant", TENANT_MIGRATIONS).await
}

async fn apply<C: Connection>(
    db: &Surreal<C>,
    store: &'static str,
    migrations: &[Migration],
) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in migrations {
        if migration.version <= current_version {
            continue;
        }
        info!(
            store,
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "{store} migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query(
            "CREATE _migration SET version = $version, \
             name = $name",
        )
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "Failed to record {store} migration v{}: {}",
                migration.version, e,
            ))
        })?;
    }

    Ok(())
}

/// Returns the raw registry schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn registry_schema_v1() -> &'static str {
    REGISTRY_SCHEMA_V1
}
