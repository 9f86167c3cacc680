//! SurrealDB implementation of [`OrganizationRepository`].

use chrono::{DateTime, Utc};
use orgplane_core::error::OrgResult;
use orgplane_core::models::organization::{CreateOrganization, Organization, RenameOrganization};
use orgplane_core::repository::{OrganizationRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

const ENTITY: &str = "organization";

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    name: String,
    slug: String,
    collection_name: String,
    tenant_store_name: String,
    admin_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrganizationRowWithId {
    record_id: String,
    name: String,
    slug: String,
    collection_name: String,
    tenant_store_name: String,
    admin_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl OrganizationRow {
    fn into_organization(self, id: Uuid) -> Result<Organization, DbError> {
        let admin_id = self
            .admin_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|e| DbError::Decode(format!("invalid admin UUID: {e}")))?;
        Ok(Organization {
            id,
            name: self.name,
            slug: self.slug,
            collection_name: self.collection_name,
            tenant_store_name: self.tenant_store_name,
            admin_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl OrganizationRowWithId {
    fn try_into_organization(self) -> Result<Organization, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        OrganizationRow {
            name: self.name,
            slug: self.slug,
            collection_name: self.collection_name,
            tenant_store_name: self.tenant_store_name,
            admin_id: self.admin_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_organization(id)
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Organization repository.
#[derive(Clone)]
pub struct SurrealOrganizationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

/// Take the single row a `type::record(...)` write statement returns.
fn single_row(result: surrealdb::IndexedResults, id_str: String) -> Result<OrganizationRow, DbError> {
    let mut result = result
        .check()
        .map_err(|e| DbError::from_statement(e, ENTITY))?;
    let rows: Vec<OrganizationRow> = result.take(0)?;
    rows.into_iter()
        .next()
        .ok_or_else(|| DbError::not_found(ENTITY, id_str))
}

impl<C: Connection> OrganizationRepository for SurrealOrganizationRepository<C> {
    async fn create(&self, input: CreateOrganization) -> OrgResult<Organization> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('organization', $id) SET \
                 name = $name, slug = $slug, \
                 collection_name = $collection_name, \
                 tenant_store_name = $tenant_store_name, \
                 admin_id = NONE, updated_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("collection_name", input.collection_name))
            .bind(("tenant_store_name", input.tenant_store_name))
            .await
            .map_err(DbError::from)?;

        Ok(single_row(result, id_str)?.into_organization(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> OrgResult<Organization> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('organization', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, id_str))?;

        Ok(row.into_organization(id)?)
    }

    async fn get_by_name(&self, name: &str) -> OrgResult<Organization> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM organization WHERE name = $name",
            )
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, format!("name={name}")))?;

        Ok(row.try_into_organization()?)
    }

    async fn set_admin(&self, id: Uuid, admin_id: Uuid) -> OrgResult<Organization> {
        let id_str = id.to_string();

        let result = self
            .db
            .query("UPDATE type::record('organization', $id) SET admin_id = $admin_id")
            .bind(("id", id_str.clone()))
            .bind(("admin_id", admin_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(single_row(result, id_str)?.into_organization(id)?)
    }

    async fn rename(&self, id: Uuid, input: RenameOrganization) -> OrgResult<Organization> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('organization', $id) SET \
                 name = $name, slug = $slug, \
                 collection_name = $collection_name, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("collection_name", input.collection_name))
            .await
            .map_err(DbError::from)?;

        Ok(single_row(result, id_str)?.into_organization(id)?)
    }

    async fn delete(&self, id: Uuid) -> OrgResult<()> {
        self.db
            .query("DELETE type::record('organization', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement(e, ENTITY))?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> OrgResult<PaginatedResult<Organization>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM organization GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM organization \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_organization())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
