//! Organization domain model.
//!
//! Organizations live in the registry. Each one owns exactly one tenant
//! collection (`org_<slug>`) in a tenant store and is administered by
//! exactly one administrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A provisioned organization.
///
/// `slug` and `collection_name` are always derived from `name` (see
/// [`crate::naming`]) and are never edited independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    pub id: Uuid,
    /// Human-supplied unique name.
    pub name: String,
    /// Lowercase identifier derived from `name` (e.g. `acme_corp`).
    pub slug: String,
    /// Tenant collection holding this organization's data (`org_<slug>`).
    pub collection_name: String,
    /// Which tenant store holds `collection_name`.
    pub tenant_store_name: String,
    /// Unset only while an organization is being created.
    pub admin_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields required to insert a new organization document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
    pub slug: String,
    pub collection_name: String,
    pub tenant_store_name: String,
}

/// Registry-side half of a rename. All three fields change together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameOrganization {
    pub name: String,
    pub slug: String,
    pub collection_name: String,
}
