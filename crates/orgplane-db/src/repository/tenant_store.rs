//! SurrealDB implementation of [`TenantStore`].
//!
//! Each tenant collection is a SCHEMALESS table. The `_collection` catalog
//! records which tables are tenant collections; its unique index is what
//! rejects a second `create_collection` for the same name.

use orgplane_core::error::OrgResult;
use orgplane_core::naming::is_valid_collection_name;
use orgplane_core::repository::TenantStore;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;

use crate::error::DbError;

const ENTITY: &str = "collection";

#[derive(Debug, SurrealValue)]
struct CollectionRow {
    name: String,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Collection names are interpolated into SurrealQL as identifiers, so
/// they are restricted to `[a-z0-9_]+`.
fn ident(name: &str) -> Result<&str, DbError> {
    if is_valid_collection_name(name) {
        Ok(name)
    } else {
        Err(DbError::InvalidCollectionName(name.into()))
    }
}

/// SurrealDB implementation of a tenant store.
#[derive(Clone)]
pub struct SurrealTenantStore<C: Connection> {
    db: Surreal<C>,
    name: String,
}

impl<C: Connection> SurrealTenantStore<C> {
    /// `name` is recorded on every organization provisioned here.
    pub fn new(db: Surreal<C>, name: impl Into<String>) -> Self {
        Self {
            db,
            name: name.into(),
        }
    }

    async fn require_collection(&self, name: &str) -> OrgResult<()> {
        if self.collection_exists(name).await? {
            Ok(())
        } else {
            Err(DbError::not_found(ENTITY, name).into())
        }
    }
}

impl<C: Connection> TenantStore for SurrealTenantStore<C> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collection_exists(&self, name: &str) -> OrgResult<bool> {
        let mut result = self
            .db
            .query("SELECT name FROM _collection WHERE name = $name")
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CollectionRow> = result.take(0).map_err(DbError::from)?;
        Ok(!rows.is_empty())
    }

    async fn create_collection(&self, name: &str) -> OrgResult<()> {
        let table = ident(name)?;
        let query = format!(
            "BEGIN TRANSACTION; \
             CREATE _collection SET name = $name; \
             DEFINE TABLE IF NOT EXISTS `{table}` SCHEMALESS; \
             COMMIT TRANSACTION;"
        );

        self.db
            .query(&query)
            .bind(("name", table.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement(e, ENTITY))?;

        debug!(collection = %table, "Created tenant collection");
        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> OrgResult<()> {
        let table = ident(name)?;
        let query = format!(
            "BEGIN TRANSACTION; \
             REMOVE TABLE IF EXISTS `{table}`; \
             DELETE _collection WHERE name = $name; \
             COMMIT TRANSACTION;"
        );

        self.db
            .query(&query)
            .bind(("name", table.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement(e, ENTITY))?;

        debug!(collection = %table, "Dropped tenant collection");
        Ok(())
    }

    async fn list_collections(&self) -> OrgResult<Vec<String>> {
        let mut result = self
            .db
            .query("SELECT name FROM _collection ORDER BY name ASC")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CollectionRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }

    async fn insert_document(&self, collection: &str, document: serde_json::Value) -> OrgResult<()> {
        let table = ident(collection)?;
        self.require_collection(table).await?;

        self.db
            .query(format!("CREATE `{table}` CONTENT $doc"))
            .bind(("doc", document))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement(e, ENTITY))?;

        Ok(())
    }

    async fn list_documents(&self, collection: &str) -> OrgResult<Vec<serde_json::Value>> {
        let table = ident(collection)?;
        self.require_collection(table).await?;

        let mut result = self
            .db
            .query(format!("SELECT * OMIT id FROM `{table}`"))
            .await
            .map_err(DbError::from)?;
        Ok(result.take(0).map_err(DbError::from)?)
    }

    async fn count_documents(&self, collection: &str) -> OrgResult<u64> {
        let table = ident(collection)?;
        self.require_collection(table).await?;

        let mut result = self
            .db
            .query(format!("SELECT count() AS total FROM `{table}` GROUP ALL"))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn copy_all_documents(&self, src: &str, dst: &str, batch_size: usize) -> OrgResult<u64> {
        let src = ident(src)?;
        let dst = ident(dst)?;
        self.require_collection(src).await?;
        self.require_collection(dst).await?;

        let batch_size = batch_size.max(1);
        // Documents stay on the server so native values (datetimes,
        // decimals, record links) keep their types.
        let copy_batch = format!(
            "LET $batch = (SELECT * OMIT id FROM `{src}` LIMIT $limit START $start); \
             FOR $doc IN $batch {{ CREATE `{dst}` CONTENT $doc; }}; \
             RETURN array::len($batch);"
        );
        let mut copied: u64 = 0;

        loop {
            let mut result = self
                .db
                .query(&copy_batch)
                .bind(("limit", batch_size as u64))
                .bind(("start", copied))
                .await
                .map_err(DbError::from)?
                .check()
                .map_err(|e| DbError::from_statement(e, ENTITY))?;
            let len: Option<u64> = result.take(2).map_err(DbError::from)?;
            let len = len.unwrap_or(0);
            if len == 0 {
                break;
            }

            copied += len;
            debug!(src = %src, dst = %dst, copied, "Copied document batch");

            if len < batch_size as u64 {
                break;
            }
        }

        Ok(copied)
    }
}
