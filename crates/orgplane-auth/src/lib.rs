//! orgplane Auth: administrator credential verification and signed
//! session tokens.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginInput, LoginOutput};
pub use token::{SessionClaims, SessionIdentity};
