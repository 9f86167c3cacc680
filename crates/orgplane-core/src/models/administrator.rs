//! Administrator domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single administrator account of an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Administrator {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    /// Set at creation, never reassigned.
    pub org_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdministrator {
    pub org_id: Uuid,
    pub email: String,
    /// Raw password (will be hashed with Argon2id before storage).
    pub password: String,
}

/// Credential changes for an existing administrator.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAdministrator {
    pub email: Option<String>,
    /// Raw password (re-hashed before storage).
    pub password: Option<String>,
}

/// Identity of the administrator performing an authenticated operation,
/// as established from a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingAdmin {
    pub admin_id: Uuid,
    pub org_id: Uuid,
    pub email: String,
}

impl From<&Administrator> for ActingAdmin {
    fn from(admin: &Administrator) -> Self {
        Self {
            admin_id: admin.id,
            org_id: admin.org_id,
            email: admin.email.clone(),
        }
    }
}
