//! Store trait definitions for data access abstraction.
//!
//! Two logical stores sit behind these traits: the registry (organizations
//! and administrators) and a tenant store (one collection per
//! organization). All operations are async. Unique constraints are enforced
//! by the store itself and surface as [`OrgError::Conflict`].
//!
//! [`OrgError::Conflict`]: crate::error::OrgError::Conflict

use uuid::Uuid;

use crate::error::OrgResult;
use crate::models::{
    administrator::{Administrator, CreateAdministrator, UpdateAdministrator},
    organization::{CreateOrganization, Organization, RenameOrganization},
};

/// Default number of documents moved per batch by
/// [`TenantStore::copy_all_documents`].
pub const DEFAULT_COPY_BATCH_SIZE: usize = 1000;

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub trait OrganizationRepository: Send + Sync {
    /// Insert a new organization with no administrator linked yet.
    ///
    /// Fails with `Conflict` if `name` or `slug` is already taken.
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = OrgResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgResult<Organization>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = OrgResult<Organization>> + Send;
    /// Link the organization to its administrator.
    fn set_admin(
        &self,
        id: Uuid,
        admin_id: Uuid,
    ) -> impl Future<Output = OrgResult<Organization>> + Send;
    /// Replace name, slug and collection name and stamp `updated_at`.
    fn rename(
        &self,
        id: Uuid,
        input: RenameOrganization,
    ) -> impl Future<Output = OrgResult<Organization>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = OrgResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = OrgResult<PaginatedResult<Organization>>> + Send;
}

pub trait AdministratorRepository: Send + Sync {
    /// Fails with `Conflict` if the email is already registered.
    fn create(
        &self,
        input: CreateAdministrator,
    ) -> impl Future<Output = OrgResult<Administrator>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgResult<Administrator>> + Send;
    fn get_by_email(&self, email: &str)
    -> impl Future<Output = OrgResult<Administrator>> + Send;
    /// Fails with `Conflict` if the new email belongs to another
    /// administrator.
    fn update(
        &self,
        id: Uuid,
        input: UpdateAdministrator,
    ) -> impl Future<Output = OrgResult<Administrator>> + Send;
    /// Remove every administrator referencing `org_id`.
    fn delete_by_org(&self, org_id: Uuid) -> impl Future<Output = OrgResult<()>> + Send;
    fn count_by_org(&self, org_id: Uuid) -> impl Future<Output = OrgResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant store
// ---------------------------------------------------------------------------

/// A physical store of per-organization collections.
///
/// Documents are opaque JSON objects; the control plane only creates,
/// drops and bulk-copies collections.
pub trait TenantStore: Send + Sync {
    /// Name recorded as `Organization::tenant_store_name`.
    fn name(&self) -> &str;
    fn collection_exists(&self, name: &str) -> impl Future<Output = OrgResult<bool>> + Send;
    /// Fails with `Conflict` if the collection already exists.
    fn create_collection(&self, name: &str) -> impl Future<Output = OrgResult<()>> + Send;
    /// Dropping a missing collection is a no-op.
    fn drop_collection(&self, name: &str) -> impl Future<Output = OrgResult<()>> + Send;
    fn list_collections(&self) -> impl Future<Output = OrgResult<Vec<String>>> + Send;
    fn insert_document(
        &self,
        collection: &str,
        document: serde_json::Value,
    ) -> impl Future<Output = OrgResult<()>> + Send;
    /// All documents of a collection, without their identity field.
    fn list_documents(
        &self,
        collection: &str,
    ) -> impl Future<Output = OrgResult<Vec<serde_json::Value>>> + Send;
    fn count_documents(&self, collection: &str) -> impl Future<Output = OrgResult<u64>> + Send;
    /// Copy every document of `src` into `dst`, `batch_size` at a time.
    ///
    /// Identity fields are stripped, so copied documents receive fresh
    /// identities. Returns the number of documents written.
    fn copy_all_documents(
        &self,
        src: &str,
        dst: &str,
        batch_size: usize,
    ) -> impl Future<Output = OrgResult<u64>> + Send;
}
