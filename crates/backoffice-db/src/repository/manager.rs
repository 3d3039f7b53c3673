//! SurrealDB implementation of [`ManagerRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters;
//! see [`crate::password`]. An optional pepper (server-side secret)
//! can be provided at construction time.

use backoffice_core::error::BackofficeResult;
use backoffice_core::models::manager::{CreateManager, Manager, UpdateManager};
use backoffice_core::repository::ManagerRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::password::hash_password;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ManagerRow {
    name: String,
    surname: String,
    email: String,
    password_hash: Option<String>,
    status: Option<String>,
    is_active: bool,
    last_login: Option<DateTime<Utc>>,
    role: String,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ManagerRowWithId {
    record_id: String,
    name: String,
    surname: String,
    email: String,
    password_hash: Option<String>,
    status: Option<String>,
    is_active: bool,
    last_login: Option<DateTime<Utc>>,
    role: String,
    created_at: DateTime<Utc>,
}

impl ManagerRow {
    fn into_manager(self, id: Uuid) -> Manager {
        Manager {
            id,
            name: self.name,
            surname: self.surname,
            email: self.email,
            password_hash: self.password_hash,
            status: self.status,
            is_active: self.is_active,
            last_login: self.last_login,
            role: self.role,
            created_at: self.created_at,
        }
    }
}

impl ManagerRowWithId {
    fn try_into_manager(self) -> Result<Manager, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        Ok(Manager {
            id,
            name: self.name,
            surname: self.surname,
            email: self.email,
            password_hash: self.password_hash,
            status: self.status,
            is_active: self.is_active,
            last_login: self.last_login,
            role: self.role,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Manager repository.
#[derive(Clone)]
pub struct SurrealManagerRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealManagerRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl<C: Connection> ManagerRepository for SurrealManagerRepository<C> {
    async fn create(&self, input: CreateManager) -> BackofficeResult<Manager> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // password_hash stays NONE: passwords are only set via update.
        let result = self
            .db
            .query(
                "CREATE type::record('manager', $id) SET \
                 name = $name, surname = $surname, email = $email",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("surname", input.surname))
            .bind(("email", input.email))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ManagerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Manager".into(),
            id: id_str,
        })?;

        Ok(row.into_manager(id))
    }

    async fn find_by_id(&self, id: Uuid) -> BackofficeResult<Option<Manager>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('manager', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ManagerRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(|row| row.into_manager(id)))
    }

    async fn find_by_email(&self, email: &str) -> BackofficeResult<Option<Manager>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM manager \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ManagerRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_manager()?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: Uuid, input: UpdateManager) -> BackofficeResult<Manager> {
        let id_str = id.to_string();

        // A raw password in the patch is hashed before storage; no
        // password field means the stored hash is left alone.
        let password_hash = match &input.password {
            Some(raw) => Some(hash_password(raw, self.pepper.as_deref())?),
            None => None,
        };

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.surname.is_some() {
            sets.push("surname = $surname");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if password_hash.is_some() {
            sets.push("password_hash = $password_hash");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        if input.last_login.is_some() {
            sets.push("last_login = $last_login");
        }

        if sets.is_empty() {
            // Nothing to change; degrade to a lookup.
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| {
                    DbError::NotFound {
                        entity: "Manager".into(),
                        id: id_str,
                    }
                    .into()
                });
        }

        let query = format!(
            "UPDATE type::record('manager', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(surname) = input.surname {
            builder = builder.bind(("surname", surname));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(hash) = password_hash {
            builder = builder.bind(("password_hash", hash));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }
        if let Some(last_login) = input.last_login {
            builder = builder.bind(("last_login", last_login));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ManagerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Manager".into(),
            id: id_str,
        })?;

        Ok(row.into_manager(id))
    }

    async fn list(&self, offset: u64, limit: u64) -> BackofficeResult<(Vec<Manager>, u64)> {
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM manager \
                 WHERE role = 'manager' GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM manager \
                 WHERE role = 'manager' \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ManagerRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_manager())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok((items, total))
    }
}
