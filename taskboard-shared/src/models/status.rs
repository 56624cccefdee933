/// Status model and database operations
///
/// A status is a unique named lookup row that tasks point at. A status in
/// use by at least one task cannot be deleted (`ON DELETE RESTRICT` on
/// `tasks.status_id`).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE statuses (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(150) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Task status (e.g. "new", "in progress", "done")
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Status {
    /// Unique status ID
    pub id: i64,

    /// Status name, unique across all statuses
    pub name: String,

    /// When the status was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new status
#[derive(Debug, Clone)]
pub struct CreateStatus {
    pub name: String,
}

/// Input for updating an existing status
#[derive(Debug, Clone)]
pub struct UpdateStatus {
    pub name: String,
}

impl Status {
    /// Creates a new status
    ///
    /// # Errors
    ///
    /// Returns an error if the name already exists or the database is
    /// unreachable.
    pub async fn create(pool: &PgPool, data: CreateStatus) -> Result<Self, sqlx::Error> {
        let status = sqlx::query_as::<_, Status>(
            r#"
            INSERT INTO statuses (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(status)
    }

    /// Finds a status by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let status = sqlx::query_as::<_, Status>(
            "SELECT id, name, created_at FROM statuses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(status)
    }

    /// Updates an existing status
    ///
    /// # Returns
    ///
    /// The updated status if found, None if the status doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let status = sqlx::query_as::<_, Status>(
            r#"
            UPDATE statuses
            SET name = $2
            WHERE id = $1
            RETURNING id, name, created_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .fetch_optional(pool)
        .await?;

        Ok(status)
    }

    /// Deletes a status by ID
    ///
    /// # Returns
    ///
    /// True if the status was deleted, false if it didn't exist
    ///
    /// # Errors
    ///
    /// Returns a foreign-key violation if the status is still in use by a
    /// task. No row is removed in that case.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM statuses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all statuses, ordered by ID for stable output
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let statuses = sqlx::query_as::<_, Status>(
            "SELECT id, name, created_at FROM statuses ORDER BY id",
        )
        .fetch_all(pool)
        .await?;

        Ok(statuses)
    }

    /// Counts total number of statuses
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM statuses")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
