//! Identity service: administrator login and session authentication.

use orgplane_core::error::{OrgError, OrgResult};
use orgplane_core::models::administrator::ActingAdmin;
use orgplane_core::repository::AdministratorRepository;
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed session token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Identity service.
///
/// Generic over the administrator repository so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<A: AdministratorRepository> {
    admin_repo: A,
    config: AuthConfig,
}

impl<A: AdministratorRepository> AuthService<A> {
    pub fn new(admin_repo: A, config: AuthConfig) -> Self {
        Self { admin_repo, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Verify administrator credentials and issue a session token.
    ///
    /// Unknown email and wrong password both fail with
    /// [`OrgError::Unauthorized`].
    pub async fn login(&self, input: LoginInput) -> OrgResult<LoginOutput> {
        let admin = match self.admin_repo.get_by_email(&input.email).await {
            Ok(admin) => admin,
            Err(OrgError::NotFound { .. }) => return Err(AuthError::InvalidCredentials.into()),
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            &input.password,
            &admin.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token =
            token::issue_session_token(admin.id, admin.org_id, &admin.email, &self.config)?;

        info!(admin_id = %admin.id, org_id = %admin.org_id, "Administrator logged in");

        Ok(LoginOutput {
            access_token,
            token_type: "bearer",
            expires_in: self.config.session_token_lifetime_secs,
        })
    }

    /// Resolve a session token to the administrator it identifies.
    ///
    /// The token must validate and its subject must still exist in the
    /// registry. Every failure is reported as the same
    /// [`OrgError::Unauthorized`].
    pub async fn authenticate(&self, raw_token: &str) -> OrgResult<ActingAdmin> {
        let identity = token::validate_session_token(raw_token, &self.config).map_err(|e| {
            debug!(error = %e, "Rejected session token");
            OrgError::Unauthorized
        })?;

        let admin = match self.admin_repo.get_by_id(identity.admin_id).await {
            Ok(admin) => admin,
            Err(OrgError::NotFound { .. }) => return Err(OrgError::Unauthorized),
            Err(e) => return Err(e),
        };

        Ok(ActingAdmin::from(&admin))
    }
}
