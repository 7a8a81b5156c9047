//! # Document Repository
//!
//! One serialized document per user, keyed by user id. The payload is
//! opaque JSON here; [`crate::document_store`] owns its shape.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// A stored document row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DocumentRecord {
    pub user_id: String,
    pub payload: String,
    pub updated_at: DateTime<Utc>,
}

/// Repository for per-user documents.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Creates a new DocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Fetches the document stored for `user_id`, if any.
    pub async fn get(&self, user_id: &str) -> StoreResult<Option<DocumentRecord>> {
        let record = sqlx::query_as::<_, DocumentRecord>(
            r#"
            SELECT user_id, payload, updated_at
            FROM documents
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        debug!(user_id = %user_id, found = record.is_some(), "Fetched document");
        Ok(record)
    }

    /// Inserts or replaces the document for `user_id`.
    ///
    /// ## Returns
    /// The timestamp recorded as `updated_at`.
    pub async fn upsert(&self, user_id: &str, payload: &str) -> StoreResult<DateTime<Utc>> {
        let now = Utc::now();

        debug!(user_id = %user_id, bytes = payload.len(), "Writing document");

        sqlx::query(
            r#"
            INSERT INTO documents (user_id, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(now)
    }

    /// Deletes the document for `user_id`.
    ///
    /// ## Errors
    /// [`StoreError::NotFound`] when there is nothing stored for the user.
    pub async fn delete(&self, user_id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Document", user_id));
        }

        debug!(user_id = %user_id, "Deleted document");
        Ok(())
    }

    /// Lists user ids that have a stored document.
    pub async fn list_users(&self) -> StoreResult<Vec<String>> {
        let users = sqlx::query_scalar::<_, String>(
            "SELECT user_id FROM documents ORDER BY user_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
