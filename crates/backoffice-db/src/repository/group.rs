//! SurrealDB implementation of [`GroupRepository`].

use backoffice_core::error::BackofficeResult;
use backoffice_core::models::group::Group;
use backoffice_core::repository::GroupRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct GroupRow {
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct GroupRowWithId {
    record_id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl GroupRowWithId {
    fn try_into_group(self) -> Result<Group, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        Ok(Group {
            id,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Group repository.
#[derive(Clone)]
pub struct SurrealGroupRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealGroupRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> GroupRepository for SurrealGroupRepository<C> {
    async fn create(&self, name: &str) -> BackofficeResult<Group> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query("CREATE type::record('order_group', $id) SET name = $name")
            .bind(("id", id_str.clone()))
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Group".into(),
            id: id_str,
        })?;

        Ok(Group {
            id,
            name: row.name,
            created_at: row.created_at,
        })
    }

    async fn find_by_name(&self, name: &str) -> BackofficeResult<Option<Group>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM order_group \
                 WHERE name = $name",
            )
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_group()?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> BackofficeResult<Vec<Group>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM order_group \
                 ORDER BY name ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;
        let groups = rows
            .into_iter()
            .map(|row| row.try_into_group())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(groups)
    }
}
