//! SurrealDB implementation of [`AdministratorRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use orgplane_core::error::OrgResult;
use orgplane_core::models::administrator::{
    Administrator, CreateAdministrator, UpdateAdministrator,
};
use orgplane_core::repository::AdministratorRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

const ENTITY: &str = "administrator";

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AdministratorRow {
    email: String,
    password_hash: String,
    org_id: String,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AdministratorRowWithId {
    record_id: String,
    email: String,
    password_hash: String,
    org_id: String,
    created_at: DateTime<Utc>,
}

impl AdministratorRow {
    fn into_administrator(self, id: Uuid) -> Result<Administrator, DbError> {
        let org_id = Uuid::parse_str(&self.org_id)
            .map_err(|e| DbError::Decode(format!("invalid org UUID: {e}")))?;
        Ok(Administrator {
            id,
            email: self.email,
            password_hash: self.password_hash,
            org_id,
            created_at: self.created_at,
        })
    }
}

impl AdministratorRowWithId {
    fn try_into_administrator(self) -> Result<Administrator, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        AdministratorRow {
            email: self.email,
            password_hash: self.password_hash,
            org_id: self.org_id,
            created_at: self.created_at,
        }
        .into_administrator(id)
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Query(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Query(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the Administrator repository.
#[derive(Clone)]
pub struct SurrealAdministratorRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealAdministratorRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }

    async fn find_one(&self, field: &'static str, value: String) -> OrgResult<Administrator> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * \
             FROM administrator WHERE {field} = $value"
        );
        let mut result = self
            .db
            .query(&query)
            .bind(("value", value.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AdministratorRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, format!("{field}={value}")))?;

        Ok(row.try_into_administrator()?)
    }
}

impl<C: Connection> AdministratorRepository for SurrealAdministratorRepository<C> {
    async fn create(&self, input: CreateAdministrator) -> OrgResult<Administrator> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('administrator', $id) SET \
                 email = $email, password_hash = $password_hash, \
                 org_id = $org_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("email", input.email))
            .bind(("password_hash", password_hash))
            .bind(("org_id", input.org_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(e, ENTITY))?;

        let rows: Vec<AdministratorRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, id_str))?;

        Ok(row.into_administrator(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> OrgResult<Administrator> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('administrator', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AdministratorRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, id_str))?;

        Ok(row.into_administrator(id)?)
    }

    async fn get_by_email(&self, email: &str) -> OrgResult<Administrator> {
        self.find_one("email", email.to_string()).await
    }

    async fn update(&self, id: Uuid, input: UpdateAdministrator) -> OrgResult<Administrator> {
        let id_str = id.to_string();

        let password_hash = input
            .password
            .as_deref()
            .map(|p| hash_password(p, self.pepper.as_deref()))
            .transpose()?;

        let mut sets = Vec::new();
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if password_hash.is_some() {
            sets.push("password_hash = $password_hash");
        }
        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE type::record('administrator', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(hash) = password_hash {
            builder = builder.bind(("password_hash", hash));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(e, ENTITY))?;

        let rows: Vec<AdministratorRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, id_str))?;

        Ok(row.into_administrator(id)?)
    }

    async fn delete_by_org(&self, org_id: Uuid) -> OrgResult<()> {
        self.db
            .query("DELETE administrator WHERE org_id = $org_id")
            .bind(("org_id", org_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement(e, ENTITY))?;

        Ok(())
    }

    async fn count_by_org(&self, org_id: Uuid) -> OrgResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM administrator \
                 WHERE org_id = $org_id GROUP ALL",
            )
            .bind(("org_id", org_id.to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
