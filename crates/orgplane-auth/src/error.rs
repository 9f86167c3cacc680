//! Authentication error types.

use orgplane_core::error::OrgError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for OrgError {
    fn from(err: AuthError) -> Self {
        match err {
            // Callers never learn why a credential or token was rejected.
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => OrgError::Unauthorized,
            AuthError::Crypto(msg) => OrgError::Crypto(msg),
        }
    }
}
