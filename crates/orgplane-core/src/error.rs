//! Error types for the orgplane control plane.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrgError {
    #[error("Invalid organization name: {name:?}")]
    InvalidName { name: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Conflict: {entity} already exists")]
    Conflict { entity: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Bad credentials or an unusable session token. Carries no cause.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Store error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OrgError {
    pub fn not_found(entity: &str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        Self::Conflict {
            entity: entity.into(),
        }
    }
}

pub type OrgResult<T> = Result<T, OrgError>;
