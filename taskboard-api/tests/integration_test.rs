/// Integration tests for the taskboard API
///
/// These tests verify the full system end-to-end against a real
/// PostgreSQL database:
/// - Authentication gating (redirect to /login/, no mutation)
/// - Referential delete protection on statuses, labels, and users
/// - Uniqueness and length validation
/// - Task filtering
/// - Ownership and authorship guards
///
/// Run with a disposable database:
///
/// ```bash
/// DATABASE_URL=postgres://localhost/taskboard_test \
/// JWT_SECRET=test-secret-key-at-least-32-bytes-long \
/// cargo test -p taskboard-api -- --ignored
/// ```

mod common;

use axum::http::{header, StatusCode};
use common::{body_json, create_user, unique, TestContext};
use serde_json::json;
use taskboard_shared::models::label::{CreateLabel, Label};
use taskboard_shared::models::status::{CreateStatus, Status};
use taskboard_shared::models::task::{CreateTask, Task, TaskFilter};
use taskboard_shared::models::user::User;

/// Unauthenticated access to a gated route redirects to /login/
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_unauthenticated_get_redirects_to_login() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.anonymous("GET", "/statuses/").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login/"
    );
}

/// Unauthenticated POST performs no mutation
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_unauthenticated_post_does_not_mutate() {
    let ctx = TestContext::new().await.unwrap();
    let before = Status::count(&ctx.db).await.unwrap();

    let response = ctx.anonymous("POST", "/statuses/create/").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(Status::count(&ctx.db).await.unwrap(), before);
}

/// The user list stays publicly readable
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_user_list_is_public() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.anonymous("GET", "/users/").await;

    assert_eq!(response.status(), StatusCode::OK);
}

/// Login issues a token; bad credentials are rejected
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_login_flow() {
    let ctx = TestContext::new().await.unwrap();

    let ok = ctx
        .anonymous_login(&ctx.user.username.clone(), "secret")
        .await;
    assert_eq!(ok.status(), StatusCode::OK);
    let body = body_json(ok).await;
    assert!(body["token"].is_string());

    let bad = ctx
        .anonymous_login(&ctx.user.username.clone(), "wrong")
        .await;
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
}

/// Status CRUD happy path: create redirects to the list with a message
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_status() {
    let ctx = TestContext::new().await.unwrap();
    let name = unique("new");

    let response = ctx.post("/statuses/create/", json!({ "name": name })).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/statuses/"
    );

    let listed = ctx.get("/statuses/").await;
    let body = body_json(listed).await;
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["name"] == name.as_str()));
}

/// Duplicate names are rejected with a field-keyed error and no new row
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_status_name_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let name = unique("dup");

    Status::create(&ctx.db, CreateStatus { name: name.clone() })
        .await
        .unwrap();
    let before = Status::count(&ctx.db).await.unwrap();

    let response = ctx.post("/statuses/create/", json!({ "name": name })).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(Status::count(&ctx.db).await.unwrap(), before);

    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "name");
}

/// A 151-character name fails validation on status, label, and task
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_overlong_name_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let long_name = "x".repeat(151);

    for uri in ["/statuses/create/", "/labels/create/"] {
        let response = ctx.post(uri, json!({ "name": long_name })).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    let response = ctx
        .post(
            "/tasks/create/",
            json!({
                "name": long_name,
                "status_id": 1,
                "executor_id": ctx.user.id,
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// Deleting a status referenced by a task leaves the row count unchanged
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_referenced_status_blocked() {
    let ctx = TestContext::new().await.unwrap();

    let status = Status::create(&ctx.db, CreateStatus { name: unique("busy") })
        .await
        .unwrap();
    Task::create(
        &ctx.db,
        ctx.user.id,
        CreateTask {
            name: unique("task"),
            description: String::new(),
            status_id: status.id,
            executor_id: ctx.user.id,
            labels: vec![],
        },
    )
    .await
    .unwrap();

    let before = Status::count(&ctx.db).await.unwrap();
    let response = ctx
        .post(
            &format!("/statuses/{}/delete/", status.id),
            json!({}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/statuses/"
    );
    assert_eq!(Status::count(&ctx.db).await.unwrap(), before);

    let body = body_json(response).await;
    assert_eq!(body["error"], "referential_conflict");
}

/// Deleting a label attached to a task is blocked
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_referenced_label_blocked() {
    let ctx = TestContext::new().await.unwrap();

    let status = Status::create(&ctx.db, CreateStatus { name: unique("s") })
        .await
        .unwrap();
    let label = Label::create(&ctx.db, CreateLabel { name: unique("bug") })
        .await
        .unwrap();
    Task::create(
        &ctx.db,
        ctx.user.id,
        CreateTask {
            name: unique("task"),
            description: String::new(),
            status_id: status.id,
            executor_id: ctx.user.id,
            labels: vec![label.id],
        },
    )
    .await
    .unwrap();

    let before = Label::count(&ctx.db).await.unwrap();
    let response = ctx
        .post(&format!("/labels/{}/delete/", label.id), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(Label::count(&ctx.db).await.unwrap(), before);
}

/// Deleting a user referenced as a task's author or executor is blocked
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_referenced_user_blocked() {
    let ctx = TestContext::new().await.unwrap();

    let status = Status::create(&ctx.db, CreateStatus { name: unique("s") })
        .await
        .unwrap();
    Task::create(
        &ctx.db,
        ctx.user.id,
        CreateTask {
            name: unique("task"),
            description: String::new(),
            status_id: status.id,
            executor_id: ctx.user.id,
            labels: vec![],
        },
    )
    .await
    .unwrap();

    let before = User::count(&ctx.db).await.unwrap();
    let response = ctx
        .post(&format!("/users/{}/delete/", ctx.user.id), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(User::count(&ctx.db).await.unwrap(), before);
}

/// Filtering by status returns exactly the matching tasks
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_filter_tasks_by_status() {
    let ctx = TestContext::new().await.unwrap();

    let s1 = Status::create(&ctx.db, CreateStatus { name: unique("s1") })
        .await
        .unwrap();
    let s2 = Status::create(&ctx.db, CreateStatus { name: unique("s2") })
        .await
        .unwrap();

    let mut matching = Vec::new();
    for (i, status_id) in [s1.id, s1.id, s2.id].iter().enumerate() {
        let task = Task::create(
            &ctx.db,
            ctx.user.id,
            CreateTask {
                name: unique(&format!("t{}", i)),
                description: String::new(),
                status_id: *status_id,
                executor_id: ctx.user.id,
                labels: vec![],
            },
        )
        .await
        .unwrap();
        if *status_id == s1.id {
            matching.push(task.id);
        }
    }

    let filter = TaskFilter {
        status: Some(s1.id),
        ..Default::default()
    };
    let tasks = Task::list(&ctx.db, &filter, None).await.unwrap();
    let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();

    assert_eq!(ids, matching);

    let response = ctx.get(&format!("/tasks/?status={}", s1.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), matching.len());
}

/// "Only own tasks" restricts the list to the caller's authored tasks
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_filter_own_tasks() {
    let ctx = TestContext::new().await.unwrap();
    let other = create_user(&ctx.db, &unique("other")).await.unwrap();

    let status = Status::create(&ctx.db, CreateStatus { name: unique("s") })
        .await
        .unwrap();

    let mine = Task::create(
        &ctx.db,
        ctx.user.id,
        CreateTask {
            name: unique("mine"),
            description: String::new(),
            status_id: status.id,
            executor_id: ctx.user.id,
            labels: vec![],
        },
    )
    .await
    .unwrap();
    Task::create(
        &ctx.db,
        other.id,
        CreateTask {
            name: unique("theirs"),
            description: String::new(),
            status_id: status.id,
            executor_id: other.id,
            labels: vec![],
        },
    )
    .await
    .unwrap();

    let filter = TaskFilter {
        own_tasks: true,
        ..Default::default()
    };
    let tasks = Task::list(&ctx.db, &filter, Some(ctx.user.id)).await.unwrap();

    assert!(tasks.iter().all(|t| t.author_id == ctx.user.id));
    assert!(tasks.iter().any(|t| t.id == mine.id));
}

/// A user can update their own record; another user's record is refused
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_user_ownership_guard() {
    let ctx = TestContext::new().await.unwrap();
    let other = create_user(&ctx.db, &unique("victim")).await.unwrap();

    let own_update = json!({
        "username": ctx.user.username,
        "first_name": "Changed",
        "last_name": "User",
        "password": "secret",
        "password_confirmation": "secret",
    });
    let response = ctx
        .post(&format!("/users/{}/update/", ctx.user.id), own_update)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/users/");

    let updated = User::find_by_id(&ctx.db, ctx.user.id).await.unwrap().unwrap();
    assert_eq!(updated.first_name, "Changed");

    // Acting on another user's record: redirect, no change persisted
    let foreign_update = json!({
        "username": other.username,
        "first_name": "Hacked",
        "last_name": "User",
        "password": "secret",
        "password_confirmation": "secret",
    });
    let response = ctx
        .post(&format!("/users/{}/update/", other.id), foreign_update)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/users/");

    let untouched = User::find_by_id(&ctx.db, other.id).await.unwrap().unwrap();
    assert_eq!(untouched.first_name, "Test");
}

/// Only a task's author may delete it
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_task_authorship_guard() {
    let ctx = TestContext::new().await.unwrap();
    let other = create_user(&ctx.db, &unique("author")).await.unwrap();

    let status = Status::create(&ctx.db, CreateStatus { name: unique("s") })
        .await
        .unwrap();
    let task = Task::create(
        &ctx.db,
        other.id,
        CreateTask {
            name: unique("task"),
            description: String::new(),
            status_id: status.id,
            executor_id: ctx.user.id,
            labels: vec![],
        },
    )
    .await
    .unwrap();

    // Non-author: redirect to the task list, row survives
    let response = ctx
        .post(&format!("/tasks/{}/delete/", task.id), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/tasks/");
    assert!(Task::find_by_id(&ctx.db, task.id).await.unwrap().is_some());

    // Author: delete goes through
    let auth = format!("Bearer {}", ctx.token_for(other.id));
    let response = ctx
        .post_as(&format!("/tasks/{}/delete/", task.id), json!({}), &auth)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(Task::find_by_id(&ctx.db, task.id).await.unwrap().is_none());
}

/// Sign-up validates the password pair and the username charset
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_signup_validation() {
    let ctx = TestContext::new().await.unwrap();
    let before = User::count(&ctx.db).await.unwrap();

    let response = ctx
        .anonymous_post(
            "/users/create/",
            json!({
                "username": "bad name!",
                "first_name": "John",
                "last_name": "Doe",
                "password": "ab",
                "password_confirmation": "cd",
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(User::count(&ctx.db).await.unwrap(), before);

    let body = body_json(response).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"username"));
    assert!(fields.contains(&"password"));
    assert!(fields.contains(&"password_confirmation"));
}

/// Task detail expands status/executor names and labels
#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_task_detail_expansion() {
    let ctx = TestContext::new().await.unwrap();

    let status = Status::create(&ctx.db, CreateStatus { name: unique("open") })
        .await
        .unwrap();
    let label = Label::create(&ctx.db, CreateLabel { name: unique("bug") })
        .await
        .unwrap();
    let task = Task::create(
        &ctx.db,
        ctx.user.id,
        CreateTask {
            name: unique("detail"),
            description: "look closer".to_string(),
            status_id: status.id,
            executor_id: ctx.user.id,
            labels: vec![label.id],
        },
    )
    .await
    .unwrap();

    let response = ctx.get(&format!("/tasks/{}/", task.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], status.name.as_str());
    assert_eq!(body["author"], "Test User");
    assert_eq!(body["labels"][0]["name"], label.name.as_str());
}
