//! Session token issuance and validation (EdDSA-signed JWT).
//!
//! Tokens are stateless: everything needed to identify the acting
//! administrator travels in the claims, and validation performs no
//! database lookup.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: administrator ID (UUID string).
    pub sub: String,
    /// Organization the administrator belongs to (UUID string).
    pub org_id: String,
    /// Administrator email at issuance time.
    pub email: String,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID (UUID string).
    pub jti: String,
}

/// Decoded identity carried by a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub admin_id: Uuid,
    pub org_id: Uuid,
    pub email: String,
}

impl TryFrom<SessionClaims> for SessionIdentity {
    type Error = AuthError;

    fn try_from(claims: SessionClaims) -> Result<Self, Self::Error> {
        let admin_id = Uuid::parse_str(&claims.sub)
            .map_err(|e| AuthError::TokenInvalid(format!("sub: {e}")))?;
        let org_id = Uuid::parse_str(&claims.org_id)
            .map_err(|e| AuthError::TokenInvalid(format!("org_id: {e}")))?;
        Ok(Self {
            admin_id,
            org_id,
            email: claims.email,
        })
    }
}

/// Issue a signed EdDSA (Ed25519) session token for an administrator.
pub fn issue_session_token(
    admin_id: Uuid,
    org_id: Uuid,
    email: &str,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        sub: admin_id.to_string(),
        org_id: org_id.to_string(),
        email: email.to_string(),
        iss: config.jwt_issuer.clone(),
        iat: now,
        exp: now + config.session_token_lifetime_secs as i64,
        jti: Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_ed_pem(config.jwt_private_key_pem.as_bytes())
        .map_err(|e| AuthError::Crypto(format!("bad private key: {e}")))?;

    jsonwebtoken::encode(&Header::new(Algorithm::EdDSA), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify a session token (signature, expiry, issuer).
pub fn decode_session_token(token: &str, config: &AuthConfig) -> Result<SessionClaims, AuthError> {
    let key = DecodingKey::from_ed_pem(config.jwt_public_key_pem.as_bytes())
        .map_err(|e| AuthError::Crypto(format!("bad public key: {e}")))?;

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);
    validation.leeway = 0;

    jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

/// Validate a session token and return the identity it carries.
pub fn validate_session_token(
    token: &str,
    config: &AuthConfig,
) -> Result<SessionIdentity, AuthError> {
    decode_session_token(token, config)?.try_into()
}
