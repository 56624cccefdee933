/// Task endpoints
///
/// All routes are gated. The list supports filtering by status, executor,
/// label, and "only own tasks"; filters AND together and an absent filter
/// imposes no constraint. The caller becomes the author on creation, and
/// only the author may delete a task.
///
/// # Endpoints
///
/// - `GET  /tasks/?status=&executor=&labels=&own_tasks=` - Filtered list
/// - `GET  /tasks/{id}/` - Detail with names and labels expanded
/// - `POST /tasks/create/` - Create (caller is recorded as author)
/// - `GET  /tasks/{id}/update/` - Current record for the edit form
/// - `POST /tasks/{id}/update/` - Full replace of editable fields
/// - `POST /tasks/{id}/delete/` - Delete (author only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::redirect_with_message,
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::middleware::AuthUser,
    guard,
    models::{
        self,
        task::{CreateTask, Task, TaskDetail, TaskFilter, UpdateTask},
    },
    validate::{self, FieldError, NAMED_ENTITY},
};

/// Task create/update form
///
/// The author is not part of the form: it is fixed to the caller at
/// creation time and never changes.
#[derive(Debug, Deserialize)]
pub struct TaskForm {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub status_id: i64,
    pub executor_id: i64,

    #[serde(default)]
    pub labels: Vec<i64>,
}

impl TaskForm {
    fn validate(&self) -> Result<(), ApiError> {
        validate::validate(NAMED_ENTITY, &[("name", &self.name)]).map_err(ApiError::Validation)
    }
}

/// Maps a foreign-key violation on insert/update to a field-keyed error:
/// the submitted status, executor, or label ID points at no existing row.
fn map_missing_reference(e: sqlx::Error) -> ApiError {
    if models::is_foreign_key_violation(&e) {
        ApiError::Validation(vec![FieldError::new(
            "references",
            "Referenced status, executor, or label does not exist.",
        )])
    } else {
        e.into()
    }
}

/// Lists tasks matching the query filters
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list(&state.db, &filter, Some(auth.user_id)).await?;
    Ok(Json(tasks))
}

/// Shows one task with author/status/executor names and labels
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskDetail>> {
    let task = Task::find_detail(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Creates a task with the caller as its author
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(form): Json<TaskForm>,
) -> ApiResult<Response> {
    form.validate()?;

    Task::create(
        &state.db,
        auth.user_id,
        CreateTask {
            name: form.name,
            description: form.description,
            status_id: form.status_id,
            executor_id: form.executor_id,
            labels: form.labels,
        },
    )
    .await
    .map_err(map_missing_reference)?;

    Ok(redirect_with_message("/tasks/", "Task successfully created"))
}

/// Returns the current record for the edit form
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskDetail>> {
    let task = Task::find_detail(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Updates a task (full replace of editable fields and labels)
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<TaskForm>,
) -> ApiResult<Response> {
    form.validate()?;

    Task::update(
        &state.db,
        id,
        UpdateTask {
            name: form.name,
            description: form.description,
            status_id: form.status_id,
            executor_id: form.executor_id,
            labels: form.labels,
        },
    )
    .await
    .map_err(map_missing_reference)?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(redirect_with_message("/tasks/", "Task successfully changed"))
}

/// Deletes a task; only its author may do so
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    guard::run([guard::require_author(auth.user_id, task.author_id)])?;

    Task::delete(&state.db, id).await?;

    Ok(redirect_with_message("/tasks/", "Task successfully deleted"))
}
