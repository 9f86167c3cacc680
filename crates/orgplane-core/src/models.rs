//! Domain models for orgplane.
//!
//! Registry entities (organizations, administrators) and the claims an
//! authenticated administrator carries into the lifecycle operations.

pub mod administrator;
pub mod organization;
