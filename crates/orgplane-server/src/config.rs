//! Process configuration loaded from `ORGPLANE_*` environment variables.

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use orgplane_auth::AuthConfig;
use orgplane_db::DbConfig;
use orgplane_lifecycle::LifecycleConfig;

/// Everything the process needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub lifecycle: LifecycleConfig,
}

impl ServerConfig {
    /// Load configuration from the environment, seeded from `.env` when
    /// one is present.
    ///
    /// The JWT key pair is required, either inline
    /// (`ORGPLANE_JWT_PRIVATE_KEY` / `ORGPLANE_JWT_PUBLIC_KEY`) or as file
    /// paths (`..._PATH`). Everything else falls back to its default.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let db_defaults = DbConfig::default();
        let db = DbConfig {
            url: var_or("ORGPLANE_DB_URL", db_defaults.url),
            namespace: var_or("ORGPLANE_DB_NAMESPACE", db_defaults.namespace),
            registry_database: var_or("ORGPLANE_DB_REGISTRY", db_defaults.registry_database),
            tenant_database: var_or("ORGPLANE_DB_TENANT", db_defaults.tenant_database),
            username: var_or("ORGPLANE_DB_USERNAME", db_defaults.username),
            password: var_or("ORGPLANE_DB_PASSWORD", db_defaults.password),
        };

        let auth_defaults = AuthConfig::default();
        let auth = AuthConfig {
            jwt_private_key_pem: pem("ORGPLANE_JWT_PRIVATE_KEY")?,
            jwt_public_key_pem: pem("ORGPLANE_JWT_PUBLIC_KEY")?,
            session_token_lifetime_secs: parse_or(
                "ORGPLANE_TOKEN_TTL_SECS",
                auth_defaults.session_token_lifetime_secs,
            )?,
            jwt_issuer: var_or("ORGPLANE_JWT_ISSUER", auth_defaults.jwt_issuer),
            pepper: env::var("ORGPLANE_PASSWORD_PEPPER").ok(),
        };

        let lifecycle_defaults = LifecycleConfig::default();
        let lifecycle = LifecycleConfig {
            copy_batch_size: parse_or(
                "ORGPLANE_COPY_BATCH_SIZE",
                lifecycle_defaults.copy_batch_size,
            )?,
            min_password_length: parse_or(
                "ORGPLANE_MIN_PASSWORD_LENGTH",
                lifecycle_defaults.min_password_length,
            )?,
            max_password_length: parse_or(
                "ORGPLANE_MAX_PASSWORD_LENGTH",
                lifecycle_defaults.max_password_length,
            )?,
        };

        Ok(Self {
            db,
            auth,
            lifecycle,
        })
    }
}

fn var_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} must be a valid number")),
        Err(_) => Ok(default),
    }
}

/// Read a PEM either from `KEY` directly or from the file named by
/// `KEY_PATH`.
fn pem(key: &str) -> Result<String> {
    if let Ok(inline) = env::var(key) {
        return Ok(inline);
    }
    let path_key = format!("{key}_PATH");
    let path = env::var(&path_key).with_context(|| format!("{key} or {path_key} must be set"))?;
    std::fs::read_to_string(&path).with_context(|| format!("failed to read {path_key}={path}"))
}
