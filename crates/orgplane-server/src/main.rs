//! orgplane: organization provisioning control plane.

mod config;

use anyhow::{Context, Result};
use orgplane_auth::AuthService;
use orgplane_core::repository::Pagination;
use orgplane_db::DbManager;
use orgplane_db::repository::{
    SurrealAdministratorRepository, SurrealOrganizationRepository, SurrealTenantStore,
};
use orgplane_lifecycle::OrgService;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orgplane=info")),
        )
        .json()
        .init();

    tracing::info!("Starting orgplane...");

    let config = ServerConfig::from_env().context("invalid configuration")?;

    let db = DbManager::connect(&config.db)
        .await
        .context("failed to connect to SurrealDB")?;

    let admins = match &config.auth.pepper {
        Some(pepper) => {
            SurrealAdministratorRepository::with_pepper(db.registry().clone(), pepper.clone())
        }
        None => SurrealAdministratorRepository::new(db.registry().clone()),
    };
    let auth = AuthService::new(admins.clone(), config.auth.clone());
    let orgs = OrgService::new(
        SurrealOrganizationRepository::new(db.registry().clone()),
        admins,
        SurrealTenantStore::new(db.tenant().clone(), db.tenant_database()),
        config.lifecycle.clone(),
    );

    let existing = orgs.list_orgs(Pagination::default()).await?;
    tracing::info!(
        organizations = existing.total,
        issuer = %auth.config().jwt_issuer,
        "orgplane ready"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!("Shutting down");
    db.close().await;
    tracing::info!("orgplane stopped.");
    Ok(())
}
