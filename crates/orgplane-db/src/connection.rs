//! SurrealDB connection management.
//!
//! The registry and the tenant store are two databases under one
//! namespace, each reached through its own connection.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::schema;

/// Configuration for connecting to SurrealDB.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket URL (e.g., `127.0.0.1:8000`).
    pub url: String,
    /// SurrealDB namespace.
    pub namespace: String,
    /// Database holding organizations and administrators.
    pub registry_database: String,
    /// Database holding per-organization tenant collections.
    pub tenant_database: String,
    /// Root username for authentication.
    pub username: String,
    /// Root password for authentication.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "orgplane".into(),
            registry_database: "master".into(),
            tenant_database: "tenant_data".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// Owns the registry and tenant store connections for the lifetime of
/// the process.
#[derive(Clone)]
pub struct DbManager {
    registry: Surreal<Client>,
    tenant: Surreal<Client>,
    tenant_database: String,
}

impl DbManager {
    /// Connect to both databases and apply pending migrations.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let registry = open(config, &config.registry_database).await?;
        let tenant = open(config, &config.tenant_database).await?;

        schema::run_migrations(&registry).await?;
        schema::run_tenant_migrations(&tenant).await?;

        info!("Successfully connected to SurrealDB");

        Ok(Self {
            registry,
            tenant,
            tenant_database: config.tenant_database.clone(),
        })
    }

    /// Returns the registry client.
    pub fn registry(&self) -> &Surreal<Client> {
        &self.registry
    }

    /// Returns the tenant store client.
    pub fn tenant(&self) -> &Surreal<Client> {
        &self.tenant
    }

    /// Name of the tenant database, recorded on every organization.
    pub fn tenant_database(&self) -> &str {
        &self.tenant_database
    }

    /// Release both connections.
    pub async fn close(self) {
        info!("Closing SurrealDB connections");
        drop(self.registry);
        drop(self.tenant);
    }
}

async fn open(config: &DbConfig, database: &str) -> Result<Surreal<Client>, DbError> {
    info!(
        url = %config.url,
        namespace = %config.namespace,
        database = %database,
        "Connecting to SurrealDB"
    );

    let db = Surreal::new::<Ws>(&config.url).await?;

    db.signin(Root {
        username: config.username.clone(),
        password: config.password.clone(),
    })
    .await?;

    db.use_ns(&config.namespace).use_db(database).await?;

    Ok(db)
}
