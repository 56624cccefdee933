/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskboard_shared::auth::{jwt, middleware::AuthUser};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// ├── POST /login/                  # Credential check, issues a token (public)
/// ├── /users/
/// │   ├── GET  /                    # List users (public read)
/// │   ├── POST /create/             # Sign up (public)
/// │   ├── GET/POST /:id/update/     # Edit own record (auth + ownership)
/// │   └── POST /:id/delete/         # Delete own record (auth + ownership,
/// │                                 #  blocked while referenced by a task)
/// ├── /statuses/, /labels/          # List/create/update/delete (auth,
/// │                                 #  delete blocked while in use)
/// └── /tasks/
///     ├── GET  /?status=&executor=&labels=&own_tasks=  # Filtered list
///     ├── GET  /:id/                # Detail with names and labels
///     ├── POST /create/             # Caller becomes the author
///     ├── GET/POST /:id/update/
///     └── POST /:id/delete/         # Author only
/// ```
///
/// Unauthenticated access to any gated route is answered with a `303` to
/// `/login/`; the handler never runs.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes: no token required
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/login/", post(routes::session::login))
        .route("/users/", get(routes::users::list))
        .route("/users/create/", post(routes::users::create));

    // Gated routes: Bearer token required
    let gated_routes = Router::new()
        .route(
            "/users/:id/update/",
            get(routes::users::edit).post(routes::users::update),
        )
        .route("/users/:id/delete/", post(routes::users::delete))
        .route("/statuses/", get(routes::statuses::list))
        .route("/statuses/create/", post(routes::statuses::create))
        .route(
            "/statuses/:id/update/",
            get(routes::statuses::edit).post(routes::statuses::update),
        )
        .route("/statuses/:id/delete/", post(routes::statuses::delete))
        .route("/labels/", get(routes::labels::list))
        .route("/labels/create/", post(routes::labels::create))
        .route(
            "/labels/:id/update/",
            get(routes::labels::edit).post(routes::labels::update),
        )
        .route("/labels/:id/delete/", post(routes::labels::delete))
        .route("/tasks/", get(routes::tasks::list))
        .route("/tasks/create/", post(routes::tasks::create))
        .route("/tasks/:id/", get(routes::tasks::detail))
        .route(
            "/tasks/:id/update/",
            get(routes::tasks::edit).post(routes::tasks::update),
        )
        .route("/tasks/:id/delete/", post(routes::tasks::delete))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(gated_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the Bearer token from the Authorization header,
/// then injects [`AuthUser`] into request extensions. A missing or invalid
/// token redirects to `/login/` without running the handler.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(crate::error::ApiError::AuthenticationRequired)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(crate::error::ApiError::AuthenticationRequired)?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthUser::from_claims(&claims));

    Ok(next.run(req).await)
}
