/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup (connects to `DATABASE_URL`, runs migrations)
/// - Test user creation and token generation
/// - Request helpers
///
/// Integration tests need a disposable PostgreSQL database; they are
/// marked `#[ignore]` and run with `cargo test -- --ignored` once
/// `DATABASE_URL` and `JWT_SECRET` point at one.

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::auth::jwt::{create_token, Claims};
use taskboard_shared::auth::password::hash_password;
use taskboard_shared::models::user::{CreateUser, User};
use tower::ServiceExt;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub token: String,
}

impl TestContext {
    /// Creates a new test context with migrations applied and one
    /// logged-in test user
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to the member crate's Cargo.toml
        sqlx::migrate!("../migrations").run(&db).await?;

        let user = create_user(&db, &unique("tester")).await?;

        let claims = Claims::new(user.id);
        let token = create_token(&claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            token,
        })
    }

    /// Returns the authorization header value for the test user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Issues a token for an arbitrary user
    pub fn token_for(&self, user_id: i64) -> String {
        let claims = Claims::new(user_id);
        create_token(&claims, &self.config.jwt.secret).expect("Token creation should succeed")
    }

    /// Sends an authenticated GET request
    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::AUTHORIZATION, self.auth_header())
            .body(Body::empty())
            .unwrap();

        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends an authenticated POST request with a JSON body
    pub async fn post(&self, uri: &str, body: serde_json::Value) -> Response {
        self.post_as(uri, body, &self.auth_header()).await
    }

    /// Sends a POST request with an explicit Authorization header value
    pub async fn post_as(&self, uri: &str, body: serde_json::Value, auth: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, auth)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends an unauthenticated POST request with a JSON body
    pub async fn anonymous_post(&self, uri: &str, body: serde_json::Value) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Submits the login form
    pub async fn anonymous_login(&self, username: &str, password: &str) -> Response {
        self.anonymous_post(
            "/login/",
            serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Sends an unauthenticated request
    pub async fn anonymous(&self, method: &str, uri: &str) -> Response {
        let builder = Request::builder().method(method).uri(uri);

        let request = if method == "POST" {
            builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        self.app.clone().oneshot(request).await.unwrap()
    }
}

/// Appends a nanosecond suffix so names survive repeated runs against the
/// same database
pub fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Creates a user directly through the model layer
pub async fn create_user(db: &PgPool, username: &str) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: hash_password("secret")?,
        },
    )
    .await?;

    Ok(user)
}

/// Reads a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
