/// Status endpoints
///
/// All routes are gated. Deletion is protected: a status still referenced
/// by a task survives the request and the caller is redirected back to the
/// status list with an error message.
///
/// # Endpoints
///
/// - `GET  /statuses/` - List statuses
/// - `POST /statuses/create/` - Create a status
/// - `GET  /statuses/{id}/update/` - Current record for the edit form
/// - `POST /statuses/{id}/update/` - Rename
/// - `POST /statuses/{id}/delete/` - Delete (blocked while in use)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::redirect_with_message,
};
use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use taskboard_shared::{
    models::{
        self,
        status::{CreateStatus, Status, UpdateStatus},
    },
    validate::{self, NAMED_ENTITY},
};

/// Status create/update form
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub name: String,
}

impl StatusForm {
    fn validate(&self) -> Result<(), ApiError> {
        validate::validate(NAMED_ENTITY, &[("name", &self.name)]).map_err(ApiError::Validation)
    }
}

/// Lists all statuses
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Status>>> {
    let statuses = Status::list(&state.db).await?;
    Ok(Json(statuses))
}

/// Creates a status
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<StatusForm>,
) -> ApiResult<Response> {
    form.validate()?;

    Status::create(&state.db, CreateStatus { name: form.name }).await?;

    Ok(redirect_with_message(
        "/statuses/",
        "Status successfully created",
    ))
}

/// Returns the current record for the edit form
pub async fn edit(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Status>> {
    let status = Status::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Status not found".to_string()))?;

    Ok(Json(status))
}

/// Renames a status
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<StatusForm>,
) -> ApiResult<Response> {
    form.validate()?;

    Status::update(&state.db, id, UpdateStatus { name: form.name })
        .await?
        .ok_or_else(|| ApiError::NotFound("Status not found".to_string()))?;

    Ok(redirect_with_message(
        "/statuses/",
        "Status successfully changed",
    ))
}

/// Deletes a status, unless a task still references it
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    match Status::delete(&state.db, id).await {
        Ok(true) => Ok(redirect_with_message(
            "/statuses/",
            "Status successfully deleted",
        )),
        Ok(false) => Err(ApiError::NotFound("Status not found".to_string())),
        Err(e) if models::is_foreign_key_violation(&e) => Err(ApiError::ReferentialConflict {
            list: "/statuses/",
            message: "It is not possible to delete a status because it is in use".to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}
