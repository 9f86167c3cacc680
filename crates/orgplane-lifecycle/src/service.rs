//! Organization lifecycle orchestration.
//!
//! The registry and the tenant store share no transaction, so every
//! multi-step operation runs its writes in a fixed order and undoes the
//! already-committed steps when a later one fails.

use orgplane_core::error::{OrgError, OrgResult};
use orgplane_core::models::administrator::{ActingAdmin, CreateAdministrator, UpdateAdministrator};
use orgplane_core::models::organization::{CreateOrganization, Organization, RenameOrganization};
use orgplane_core::naming;
use orgplane_core::repository::{
    AdministratorRepository, DEFAULT_COPY_BATCH_SIZE, OrganizationRepository, PaginatedResult,
    Pagination, TenantStore,
};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Longest accepted organization name, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Tunables for the lifecycle manager.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Documents moved per batch when a rename migrates tenant data.
    pub copy_batch_size: usize,
    /// Minimum administrator password length.
    pub min_password_length: usize,
    /// Maximum administrator password length.
    pub max_password_length: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            copy_batch_size: DEFAULT_COPY_BATCH_SIZE,
            min_password_length: 8,
            max_password_length: 200,
        }
    }
}

/// Input for provisioning a new organization and its administrator.
#[derive(Debug, Clone)]
pub struct CreateOrgInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Input for updating an organization.
///
/// The administrator's email and password are always replaced; the
/// organization is renamed only when `new_name` is non-empty after
/// trimming and differs from the current name.
#[derive(Debug, Clone)]
pub struct UpdateOrgInput {
    pub name: String,
    pub new_name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Orchestrates create, rename and delete across the registry and the
/// tenant store.
pub struct OrgService<O, A, T>
where
    O: OrganizationRepository,
    A: AdministratorRepository,
    T: TenantStore,
{
    orgs: O,
    admins: A,
    tenants: T,
    config: LifecycleConfig,
}

impl<O, A, T> OrgService<O, A, T>
where
    O: OrganizationRepository,
    A: AdministratorRepository,
    T: TenantStore,
{
    pub fn new(orgs: O, admins: A, tenants: T, config: LifecycleConfig) -> Self {
        Self {
            orgs,
            admins,
            tenants,
            config,
        }
    }

    /// Provision an organization, its tenant collection and its
    /// administrator.
    ///
    /// Either all three exist and reference each other afterwards, or none
    /// of them do.
    pub async fn create_org(&self, input: CreateOrgInput) -> OrgResult<Organization> {
        validate_name(&input.name)?;
        self.validate_password(&input.password)?;

        self.ensure_name_free(&input.name).await?;

        let slug = naming::slugify(&input.name)?;
        let collection = naming::collection_name(&input.name)?;
        if self.tenants.collection_exists(&collection).await? {
            return Err(OrgError::conflict("collection"));
        }

        self.tenants.create_collection(&collection).await?;

        let org = match self
            .orgs
            .create(CreateOrganization {
                name: input.name.clone(),
                slug,
                collection_name: collection.clone(),
                tenant_store_name: self.tenants.name().to_string(),
            })
            .await
        {
            Ok(org) => org,
            Err(e) => {
                self.discard_collection(&collection).await;
                return Err(e);
            }
        };

        let admin = match self
            .admins
            .create(CreateAdministrator {
                org_id: org.id,
                email: input.email,
                password: input.password,
            })
            .await
        {
            Ok(admin) => admin,
            Err(e) => {
                warn!(org_id = %org.id, error = %e, "Administrator insert failed, rolling back");
                self.discard_organization(org.id).await;
                self.discard_collection(&collection).await;
                return Err(e);
            }
        };

        let org = match self.orgs.set_admin(org.id, admin.id).await {
            Ok(org) => org,
            Err(e) => {
                warn!(org_id = %org.id, error = %e, "Linking administrator failed, rolling back");
                self.discard_administrators(org.id).await;
                self.discard_organization(org.id).await;
                self.discard_collection(&collection).await;
                return Err(e);
            }
        };

        info!(
            org_id = %org.id,
            admin_id = %admin.id,
            collection = %org.collection_name,
            "Organization created"
        );
        Ok(org)
    }

    /// Look up an organization by its exact name.
    pub async fn get_org_by_name(&self, name: &str) -> OrgResult<Organization> {
        self.orgs.get_by_name(name).await
    }

    pub async fn list_orgs(&self, pagination: Pagination) -> OrgResult<PaginatedResult<Organization>> {
        self.orgs.list(pagination).await
    }

    /// Optionally rename an organization (migrating its tenant data), then
    /// replace the acting administrator's email and password.
    pub async fn update_org(
        &self,
        input: UpdateOrgInput,
        acting: &ActingAdmin,
    ) -> OrgResult<Organization> {
        let mut org = self.orgs.get_by_name(&input.name).await?;
        authorize(acting, &org)?;
        self.validate_password(&input.password)?;

        let new_name = input
            .new_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty() && *n != org.name);
        if let Some(new_name) = new_name {
            org = self.rename(org, new_name).await?;
        }

        self.admins
            .update(
                acting.admin_id,
                UpdateAdministrator {
                    email: Some(input.email),
                    password: Some(input.password),
                },
            )
            .await?;

        self.orgs.get_by_id(org.id).await
    }

    /// Remove an organization's tenant data, its administrators and its
    /// registry entry, in that order.
    pub async fn delete_org(&self, name: &str, acting: &ActingAdmin) -> OrgResult<()> {
        let org = self.orgs.get_by_name(name).await?;
        authorize(acting, &org)?;
        self.ensure_local_store(&org)?;

        self.tenants.drop_collection(&org.collection_name).await?;
        self.admins.delete_by_org(org.id).await?;
        self.orgs.delete(org.id).await?;

        info!(org_id = %org.id, collection = %org.collection_name, "Organization deleted");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Rename
    // -------------------------------------------------------------------

    /// Order: create new collection, copy, update registry, drop old
    /// collection. The old collection is destroyed last, once the new
    /// data and the registry record are durable.
    ///
    /// Writes that land in the old collection while the copy runs are
    /// not carried over.
    async fn rename(&self, org: Organization, new_name: &str) -> OrgResult<Organization> {
        validate_name(new_name)?;
        self.ensure_local_store(&org)?;
        self.ensure_name_free(new_name).await?;

        let new_slug = naming::slugify(new_name)?;
        let new_collection = naming::collection_name(new_name)?;
        if self.tenants.collection_exists(&new_collection).await? {
            return Err(OrgError::conflict("collection"));
        }

        self.tenants.create_collection(&new_collection).await?;

        let renamed = match self
            .migrate(&org, new_name, new_slug, &new_collection)
            .await
        {
            Ok(renamed) => renamed,
            Err(e) => {
                warn!(org_id = %org.id, error = %e, "Rename failed, discarding new collection");
                self.discard_collection(&new_collection).await;
                return Err(e);
            }
        };

        if let Err(e) = self.tenants.drop_collection(&org.collection_name).await {
            // The registry already points at the new collection; the old
            // one is left behind.
            error!(
                org_id = %org.id,
                collection = %org.collection_name,
                error = %e,
                "Failed to drop old collection after rename"
            );
            return Err(e);
        }

        info!(
            org_id = %org.id,
            from = %org.collection_name,
            to = %renamed.collection_name,
            "Organization renamed"
        );
        Ok(renamed)
    }

    async fn migrate(
        &self,
        org: &Organization,
        new_name: &str,
        new_slug: String,
        new_collection: &str,
    ) -> OrgResult<Organization> {
        let copied = self
            .tenants
            .copy_all_documents(
                &org.collection_name,
                new_collection,
                self.config.copy_batch_size,
            )
            .await?;
        info!(org_id = %org.id, copied, "Copied tenant documents");

        self.orgs
            .rename(
                org.id,
                RenameOrganization {
                    name: new_name.to_string(),
                    slug: new_slug,
                    collection_name: new_collection.to_string(),
                },
            )
            .await
    }

    // -------------------------------------------------------------------
    // Checks
    // -------------------------------------------------------------------

    async fn ensure_name_free(&self, name: &str) -> OrgResult<()> {
        match self.orgs.get_by_name(name).await {
            Ok(_) => Err(OrgError::conflict("organization")),
            Err(OrgError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn ensure_local_store(&self, org: &Organization) -> OrgResult<()> {
        if org.tenant_store_name == self.tenants.name() {
            Ok(())
        } else {
            Err(OrgError::Internal(format!(
                "organization {} lives in tenant store {:?}, not {:?}",
                org.id,
                org.tenant_store_name,
                self.tenants.name()
            )))
        }
    }

    fn validate_password(&self, password: &str) -> OrgResult<()> {
        let len = password.chars().count();
        let (min, max) = (
            self.config.min_password_length,
            self.config.max_password_length,
        );
        if len < min || len > max {
            return Err(OrgError::Validation {
                message: format!("password must be {min}-{max} characters"),
            });
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Compensation
    // -------------------------------------------------------------------

    async fn discard_collection(&self, name: &str) {
        warn!(collection = %name, "Compensating: dropping tenant collection");
        if let Err(e) = self.tenants.drop_collection(name).await {
            error!(collection = %name, error = %e, "Compensation failed: collection left behind");
        }
    }

    async fn discard_organization(&self, org_id: Uuid) {
        warn!(org_id = %org_id, "Compensating: deleting organization");
        if let Err(e) = self.orgs.delete(org_id).await {
            error!(org_id = %org_id, error = %e, "Compensation failed: organization left behind");
        }
    }

    async fn discard_administrators(&self, org_id: Uuid) {
        warn!(org_id = %org_id, "Compensating: deleting administrators");
        if let Err(e) = self.admins.delete_by_org(org_id).await {
            error!(org_id = %org_id, error = %e, "Compensation failed: administrator left behind");
        }
    }
}

fn validate_name(name: &str) -> OrgResult<()> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(OrgError::Validation {
            message: format!("organization name must be 1-{MAX_NAME_LEN} characters"),
        });
    }
    Ok(())
}

/// An administrator may only act on their own organization.
fn authorize(acting: &ActingAdmin, org: &Organization) -> OrgResult<()> {
    if acting.org_id != org.id {
        return Err(OrgError::Forbidden {
            reason: "administrator does not belong to this organization".into(),
        });
    }
    Ok(())
}
