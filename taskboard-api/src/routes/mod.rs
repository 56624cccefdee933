/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `session`: Login endpoint (credential check, token issuance)
/// - `users`: User sign-up and self-service CRUD
/// - `statuses`: Status CRUD
/// - `labels`: Label CRUD
/// - `tasks`: Task CRUD, detail, and filtered listing

pub mod health;
pub mod labels;
pub mod session;
pub mod statuses;
pub mod tasks;
pub mod users;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success message body carried on mutation redirects
#[derive(Debug, Serialize)]
struct FlashResponse {
    message: String,
}

/// Builds the `303 See Other` success response every mutation ends with:
/// a redirect to the resource's list page plus a success message body.
pub(crate) fn redirect_with_message(location: &'static str, message: &str) -> Response {
    let body = Json(FlashResponse {
        message: message.to_string(),
    });

    let mut response = (StatusCode::SEE_OTHER, body).into_response();
    response
        .headers_mut()
        .insert(header::LOCATION, HeaderValue::from_static(location));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_with_message() {
        let response = redirect_with_message("/statuses/", "Status successfully created");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/statuses/"
        );
    }
}
