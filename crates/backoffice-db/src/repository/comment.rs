//! SurrealDB implementation of [`CommentRepository`].

use backoffice_core::error::BackofficeResult;
use backoffice_core::models::comment::{Comment, CreateComment};
use backoffice_core::repository::CommentRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CommentRow {
    order_id: String,
    author: String,
    text: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CommentRowWithId {
    record_id: String,
    order_id: String,
    author: String,
    text: String,
    created_at: DateTime<Utc>,
}

fn parse_order_id(raw: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::Corrupt(format!("invalid order UUID: {e}")))
}

impl CommentRowWithId {
    fn try_into_comment(self) -> Result<Comment, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        Ok(Comment {
            id,
            order_id: parse_order_id(&self.order_id)?,
            author: self.author,
            text: self.text,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Comment repository.
#[derive(Clone)]
pub struct SurrealCommentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCommentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CommentRepository for SurrealCommentRepository<C> {
    async fn create(&self, input: CreateComment) -> BackofficeResult<Comment> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('comment', $id) SET \
                 order_id = $order_id, author = $author, text = $text",
            )
            .bind(("id", id_str.clone()))
            .bind(("order_id", input.order_id.to_string()))
            .bind(("author", input.author))
            .bind(("text", input.text))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<CommentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Comment".into(),
            id: id_str,
        })?;

        Ok(Comment {
            id,
            order_id: parse_order_id(&row.order_id)?,
            author: row.author,
            text: row.text,
            created_at: row.created_at,
        })
    }

    async fn list_by_order(&self, order_id: Uuid) -> BackofficeResult<Vec<Comment>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM comment \
                 WHERE order_id = $order_id \
                 ORDER BY created_at ASC",
            )
            .bind(("order_id", order_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CommentRowWithId> = result.take(0).map_err(DbError::from)?;
        let comments = rows
            .into_iter()
            .map(|row| row.try_into_comment())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(comments)
    }
}
