/// Label endpoints
///
/// Same shape as the status endpoints: gated CRUD with protected deletion.
/// A label attached to at least one task cannot be deleted.

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
        label::{CreateLabel, Label, UpdateLabel},
    },
    validate::{self, NAMED_ENTITY},
};

/// Label create/update form
#[derive(Debug, Deserialize)]
pub struct LabelForm {
    pub name: String,
}

impl LabelForm {
    fn validate(&self) -> Result<(), ApiError> {
        validate::validate(NAMED_ENTITY, &[("name", &self.name)]).map_err(ApiError::Validation)
    }
}

/// Lists all labels
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Label>>> {
    let labels = Label::list(&state.db).await?;
    Ok(Json(labels))
}

/// Creates a label
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<LabelForm>,
) -> ApiResult<Response> {
    form.validate()?;

    Label::create(&state.db, CreateLabel { name: form.name }).await?;

    Ok(redirect_with_message(
        "/labels/",
        "Label successfully created",
    ))
}

/// Returns the current record for the edit form
pub async fn edit(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Label>> {
    let label = Label::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Label not found".to_string()))?;

    Ok(Json(label))
}

/// Renames a label
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<LabelForm>,
) -> ApiResult<Response> {
    form.validate()?;

    Label::update(&state.db, id, UpdateLabel { name: form.name })
        .await?
        .ok_or_else(|| ApiError::NotFound("Label not found".to_string()))?;

    Ok(redirect_with_message(
        "/labels/",
        "Label successfully changed",
    ))
}

/// Deletes a label, unless a task still carries it
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    match Label::delete(&state.db, id).await {
        Ok(true) => Ok(redirect_with_message(
            "/labels/",
            "Label successfully deleted",
        )),
        Ok(false) => Err(ApiError::NotFound("Label not found".to_string())),
        Err(e) if models::is_foreign_key_violation(&e) => Err(ApiError::ReferentialConflict {
            list: "/labels/",
            message: "It is not possible to delete a label because it is in use".to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}
