/// Authenticated-user request extension
///
/// The API server validates the Bearer token in a router-level middleware
/// and inserts an [`AuthUser`] into the request extensions. Handlers pull
/// it out with axum's `Extension` extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskboard_shared::auth::middleware::AuthUser;
///
/// async fn handler(Extension(auth): Extension<AuthUser>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use serde::{Deserialize, Serialize};

use super::jwt::Claims;

/// Identity of the authenticated caller, derived from validated JWT claims
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthUser {
    /// Authenticated user ID
    pub user_id: i64,
}

impl AuthUser {
    /// Creates the caller identity from validated claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
        }
    }
}
