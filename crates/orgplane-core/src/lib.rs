//! orgplane core: domain models, naming rules, error taxonomy and the
//! store traits shared by every other crate.

pub mod error;
pub mod models;
pub mod naming;
pub mod repository;

pub use error::{OrgError, OrgResult};
