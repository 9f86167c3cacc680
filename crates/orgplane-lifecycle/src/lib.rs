//! orgplane Lifecycle: the organization state machine.
//!
//! An organization is absent, active, or (transiently) being renamed.
//! [`OrgService`] drives the transitions: create, rename with tenant data
//! migration, and delete.

pub mod service;

pub use service::{CreateOrgInput, LifecycleConfig, OrgService, UpdateOrgInput};
