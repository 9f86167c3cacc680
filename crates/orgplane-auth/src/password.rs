//! Administrator password verification (Argon2id, PHC string format).
//!
//! Hashes are produced by the administrator repository when an account is
//! created or its credentials change; this module only checks them.

use std::borrow::Cow;

use argon2::{Argon2, PasswordHash, PasswordVerifier};

use crate::error::AuthError;

/// Apply the server-side pepper, if any, the same way the hashing side does.
pub(crate) fn peppered<'a>(password: &'a str, pepper: Option<&str>) -> Cow<'a, [u8]> {
    match pepper {
        Some(p) => Cow::Owned(format!("{p}{password}").into_bytes()),
        None => Cow::Borrowed(password.as_bytes()),
    }
}

/// Check `password` against a stored hash.
///
/// The Argon2 variant and cost parameters are read from the PHC string,
/// so hashes created with stronger parameters keep verifying.
///
/// Returns `Ok(false)` on mismatch and `Err(AuthError::Crypto)` only when
/// the stored hash cannot be parsed.
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(&peppered(password, pepper), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}
