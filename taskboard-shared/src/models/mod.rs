/// Database models for taskboard
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts with credentials
/// - `status`: Task statuses (unique named lookup rows)
/// - `label`: Task labels, related to tasks via the `task_labels` join table
/// - `task`: Tasks with author, status, executor, and labels
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::status::{CreateStatus, Status};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let status = Status::create(&pool, CreateStatus { name: "new".to_string() }).await?;
/// # Ok(())
/// # }
/// ```

pub mod label;
pub mod status;
pub mod task;
pub mod user;

/// Checks whether a sqlx error is a foreign-key violation
///
/// Used by delete commands to detect the referenced-row case: a Status,
/// Label, or User that is still pointed to by a task cannot be removed.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(db_err.kind(), sqlx::error::ErrorKind::ForeignKeyViolation)
        }
        _ => false,
    }
}

/// Returns the violated unique constraint name, if the error is one
///
/// Used to map duplicate-name inserts back to a field-keyed validation
/// error instead of a bare 500.
pub fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err)
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            Some(db_err.constraint().unwrap_or("unique").to_string())
        }
        _ => None,
    }
}
