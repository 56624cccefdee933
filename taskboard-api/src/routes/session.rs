/// Login endpoint
///
/// Checks credentials and issues the JWT the gated routes expect. There is
/// no server-side session: logging out is discarding the token.
///
/// # Endpoint
///
/// ```text
/// POST /login/
/// Content-Type: application/json
///
/// {
///   "username": "jdoe",
///   "password": "secret"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "user_id": 1,
///   "token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown username or wrong password

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{jwt, password},
    models::user::User,
};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,

    /// Plaintext password, verified against the stored hash
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Authenticated user ID
    pub user_id: i64,

    /// Bearer token for gated routes (24h)
    pub token: String,
}

/// Login handler
///
/// The same error is returned for an unknown username and a wrong
/// password, so the endpoint does not leak which usernames exist.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let claims = jwt::Claims::new(user.id);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        user_id: user.id,
        token,
    }))
}
