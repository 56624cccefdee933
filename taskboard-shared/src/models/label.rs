/// Label model and database operations
///
/// Labels are attached to tasks through the `task_labels` join table. A
/// label referenced by at least one task cannot be deleted (`ON DELETE
/// RESTRICT` on `task_labels.label_id`). Same shape as `Status` otherwise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Task label (e.g. "bug", "feature")
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Label {
    /// Unique label ID
    pub id: i64,

    /// Label name, unique across all labels
    pub name: String,

    /// When the label was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new label
#[derive(Debug, Clone)]
pub struct CreateLabel {
    pub name: String,
}

/// Input for updating an existing label
#[derive(Debug, Clone)]
pub struct UpdateLabel {
    pub name: String,
}

impl Label {
    /// Creates a new label
    pub async fn create(pool: &PgPool, data: CreateLabel) -> Result<Self, sqlx::Error> {
        let label = sqlx::query_as::<_, Label>(
            r#"
            INSERT INTO labels (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(label)
    }

    /// Finds a label by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let label =
            sqlx::query_as::<_, Label>("SELECT id, name, created_at FROM labels WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(label)
    }

    /// Updates an existing label
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateLabel,
    ) -> Result<Option<Self>, sqlx::Error> {
        let label = sqlx::query_as::<_, Label>(
            r#"
            UPDATE labels
            SET name = $2
            WHERE id = $1
            RETURNING id, name, created_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .fetch_optional(pool)
        .await?;

        Ok(label)
    }

    /// Deletes a label by ID
    ///
    /// # Errors
    ///
    /// Returns a foreign-key violation if the label is still attached to a
    /// task. No row is removed in that case.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM labels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all labels, ordered by ID for stable output
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let labels =
            sqlx::query_as::<_, Label>("SELECT id, name, created_at FROM labels ORDER BY id")
                .fetch_all(pool)
                .await?;

        Ok(labels)
    }

    /// Counts total number of labels
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM labels")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
