/// Task model and database operations
///
/// Tasks are the central entity: each one has a mandatory author, status,
/// and executor, plus zero or more labels via the `task_labels` join table.
/// All three references are `ON DELETE RESTRICT`, so the referenced rows
/// cannot disappear while the task exists.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(150) NOT NULL UNIQUE,
///     description TEXT NOT NULL DEFAULT '',
///     author_id BIGINT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     status_id BIGINT NOT NULL REFERENCES statuses(id) ON DELETE RESTRICT,
///     executor_id BIGINT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE task_labels (
///     task_id BIGINT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     label_id BIGINT NOT NULL REFERENCES labels(id) ON DELETE RESTRICT,
///     PRIMARY KEY (task_id, label_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, Task, TaskFilter};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, 1, CreateTask {
///     name: "Fix the boiler".to_string(),
///     description: String::new(),
///     status_id: 1,
///     executor_id: 2,
///     labels: vec![3],
/// }).await?;
///
/// // Tasks with status 1 assigned to user 2
/// let filter = TaskFilter {
///     status: Some(1),
///     executor: Some(2),
///     ..Default::default()
/// };
/// let tasks = Task::list(&pool, &filter, None).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::label::Label;

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Task name, unique across all tasks
    pub name: String,

    /// Free-text description (may be empty)
    pub description: String,

    /// User who created the task
    pub author_id: i64,

    /// Current status
    pub status_id: i64,

    /// User the task is assigned to
    pub executor_id: i64,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Task with related names expanded, as shown on the detail page
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TaskDetail {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub author_id: i64,

    /// Author's full name
    pub author: String,

    pub status_id: i64,

    /// Status name
    pub status: String,

    pub executor_id: i64,

    /// Executor's full name
    pub executor: String,

    pub created_at: DateTime<Utc>,

    /// Labels attached to the task (filled by a second query)
    #[sqlx(skip)]
    pub labels: Vec<Label>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub name: String,
    pub description: String,
    pub status_id: i64,
    pub executor_id: i64,

    /// Labels to attach (may be empty)
    pub labels: Vec<i64>,
}

/// Input for updating an existing task (full replace of editable fields)
///
/// The author is not editable; it is fixed at creation time.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub name: String,
    pub description: String,
    pub status_id: i64,
    pub executor_id: i64,
    pub labels: Vec<i64>,
}

/// Read-only task list restriction
///
/// Filters AND together; an absent filter imposes no constraint.
/// `own_tasks` restricts to tasks authored by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// Only tasks with this status
    pub status: Option<i64>,

    /// Only tasks assigned to this executor
    pub executor: Option<i64>,

    /// Only tasks carrying this label (query parameter `labels`)
    pub labels: Option<i64>,

    /// Only tasks authored by the current caller
    #[serde(default)]
    pub own_tasks: bool,
}

impl TaskFilter {
    /// Composes the filter into a `WHERE` clause fragment and its binds
    ///
    /// Returns an empty clause when no filter is supplied. Bind
    /// placeholders are numbered from `$1` in the order the predicates
    /// appear, so the caller must bind the returned values in order.
    pub fn predicate(&self, caller: Option<i64>) -> (String, Vec<i64>) {
        let mut conditions = Vec::new();
        let mut binds = Vec::new();

        if let Some(status_id) = self.status {
            binds.push(status_id);
            conditions.push(format!("t.status_id = ${}", binds.len()));
        }

        if let Some(executor_id) = self.executor {
            binds.push(executor_id);
            conditions.push(format!("t.executor_id = ${}", binds.len()));
        }

        if let Some(label_id) = self.labels {
            binds.push(label_id);
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM task_labels tl \
                 WHERE tl.task_id = t.id AND tl.label_id = ${})",
                binds.len()
            ));
        }

        if self.own_tasks {
            if let Some(author_id) = caller {
                binds.push(author_id);
                conditions.push(format!("t.author_id = ${}", binds.len()));
            }
        }

        (conditions.join(" AND "), binds)
    }
}

impl Task {
    /// Creates a new task with its label links, atomically
    ///
    /// The caller is recorded as the task's author.
    ///
    /// # Errors
    ///
    /// Returns an error if the name already exists, a referenced
    /// status/executor/label row is missing, or the database is
    /// unreachable. The transaction is rolled back on any failure.
    pub async fn create(
        pool: &PgPool,
        author_id: i64,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (name, description, author_id, status_id, executor_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, author_id, status_id, executor_id, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(author_id)
        .bind(data.status_id)
        .bind(data.executor_id)
        .fetch_one(&mut *tx)
        .await?;

        for label_id in &data.labels {
            sqlx::query("INSERT INTO task_labels (task_id, label_id) VALUES ($1, $2)")
                .bind(task.id)
                .bind(label_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, author_id, status_id, executor_id, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID with author/status/executor names and labels
    pub async fn find_detail(pool: &PgPool, id: i64) -> Result<Option<TaskDetail>, sqlx::Error> {
        let detail = sqlx::query_as::<_, TaskDetail>(
            r#"
            SELECT t.id, t.name, t.description,
                   t.author_id, a.first_name || ' ' || a.last_name AS author,
                   t.status_id, s.name AS status,
                   t.executor_id, e.first_name || ' ' || e.last_name AS executor,
                   t.created_at
            FROM tasks t
            JOIN users a ON a.id = t.author_id
            JOIN statuses s ON s.id = t.status_id
            JOIN users e ON e.id = t.executor_id
            WHERE t.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let Some(mut detail) = detail else {
            return Ok(None);
        };

        detail.labels = Self::labels(pool, id).await?;

        Ok(Some(detail))
    }

    /// Lists the labels attached to a task, ordered by label ID
    pub async fn labels(pool: &PgPool, task_id: i64) -> Result<Vec<Label>, sqlx::Error> {
        let labels = sqlx::query_as::<_, Label>(
            r#"
            SELECT l.id, l.name, l.created_at
            FROM labels l
            JOIN task_labels tl ON tl.label_id = l.id
            WHERE tl.task_id = $1
            ORDER BY l.id
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(labels)
    }

    /// Lists tasks matching the filter, ordered by ID for stable output
    ///
    /// `caller` is the current user's ID, consulted only when
    /// `filter.own_tasks` is set.
    pub async fn list(
        pool: &PgPool,
        filter: &TaskFilter,
        caller: Option<i64>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let (clause, binds) = filter.predicate(caller);

        let mut sql = String::from(
            "SELECT t.id, t.name, t.description, t.author_id, t.status_id, \
             t.executor_id, t.created_at FROM tasks t",
        );
        if !clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
        sql.push_str(" ORDER BY t.id");

        let mut query = sqlx::query_as::<_, Task>(&sql);
        for bind in binds {
            query = query.bind(bind);
        }

        let tasks = query.fetch_all(pool).await?;

        Ok(tasks)
    }

    /// Updates an existing task and replaces its label links, atomically
    ///
    /// # Returns
    ///
    /// The updated task if found, None if the task doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET name = $2, description = $3, status_id = $4, executor_id = $5
            WHERE id = $1
            RETURNING id, name, description, author_id, status_id, executor_id, created_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.status_id)
        .bind(data.executor_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(task) = task else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM task_labels WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for label_id in &data.labels {
            sqlx::query("INSERT INTO task_labels (task_id, label_id) VALUES ($1, $2)")
                .bind(id)
                .bind(label_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Some(task))
    }

    /// Deletes a task by ID
    ///
    /// Label links are removed by the `ON DELETE CASCADE` on `task_labels`.
    ///
    /// # Returns
    ///
    /// True if the task was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total number of tasks
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
