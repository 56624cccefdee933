/// User endpoints: public sign-up and list, gated self-service CRUD
///
/// The user list stays publicly readable (matching the original product
/// behavior); everything else is gated. Update and delete additionally run
/// the ownership guard: a user may only change or remove their own record.
///
/// # Endpoints
///
/// - `GET  /users/` - List users (public read)
/// - `POST /users/create/` - Sign up (public)
/// - `GET  /users/{id}/update/` - Current record for the edit form
/// - `POST /users/{id}/update/` - Full replace of editable fields
/// - `POST /users/{id}/delete/` - Delete own record; blocked while the
///   user is referenced by a task as author or executor

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::redirect_with_message,
};
use axum::{
    extract::{Path, State},
    response::Response,
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::{middleware::AuthUser, password},
    guard,
    models::{
        self,
        user::{CreateUser, UpdateUser, User},
    },
    validate::{self, USER_FORM},
};

/// Sign-up / user update form
#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirmation: String,
}

impl UserForm {
    /// Runs the user validator table plus the password-pair check
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = match validate::validate(
            USER_FORM,
            &[
                ("username", &self.username),
                ("first_name", &self.first_name),
                ("last_name", &self.last_name),
                ("password", &self.password),
            ],
        ) {
            Ok(()) => Vec::new(),
            Err(errors) => errors,
        };

        if let Err(e) = validate::validate_password_pair(&self.password, &self.password_confirmation)
        {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

/// Lists all users (public read)
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = User::list(&state.db).await?;
    Ok(Json(users))
}

/// Sign-up handler
///
/// Validates the form, hashes the password, and creates the account.
/// A duplicate username is reported as a field-keyed validation error.
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<UserForm>,
) -> ApiResult<Response> {
    form.validate()?;

    let password_hash = password::hash_password(&form.password)?;

    User::create(
        &state.db,
        CreateUser {
            username: form.username,
            first_name: form.first_name,
            last_name: form.last_name,
            password_hash,
        },
    )
    .await?;

    Ok(redirect_with_message(
        "/users/",
        "User is successfully registered",
    ))
}

/// Returns the caller's current record for the edit form
pub async fn edit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    guard::run([guard::require_self(auth.user_id, id)])?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Updates the caller's own record (full replace of editable fields)
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(form): Json<UserForm>,
) -> ApiResult<Response> {
    guard::run([guard::require_self(auth.user_id, id)])?;

    form.validate()?;

    let password_hash = password::hash_password(&form.password)?;

    User::update(
        &state.db,
        id,
        UpdateUser {
            username: form.username,
            first_name: form.first_name,
            last_name: form.last_name,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(redirect_with_message("/users/", "User successfully changed"))
}

/// Deletes the caller's own record
///
/// A user still referenced by a task as author or executor cannot be
/// removed; the foreign-key violation becomes a referential-conflict
/// redirect and no row is deleted.
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    guard::run([guard::require_self(auth.user_id, id)])?;

    match User::delete(&state.db, id).await {
        Ok(true) => Ok(redirect_with_message("/users/", "User successfully deleted")),
        Ok(false) => Err(ApiError::NotFound("User not found".to_string())),
        Err(e) if models::is_foreign_key_violation(&e) => Err(ApiError::ReferentialConflict {
            list: "/users/",
            message: "It is not possible to delete a user because it is in use".to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}
