mod common;

use axum::Router;
use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{authed_json_request, json_request, response_json, setup_test_app};

async fn register_teacher(app: Router, email: &str) -> String {
    let response = json_request(
        app,
        "POST",
        "/api/auth/register",
        json!({
            "firstName": "Ann",
            "lastName": "Lee",
            "email": email,
            "password": "pw1"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

fn lesson_body(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "Quadratic equations",
        "startTime": "2026-09-01T10:00:00Z",
        "endTime": "2026-09-01T11:00:00Z"
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_lesson(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = register_teacher(app.clone(), "t@x.com").await;

    let response = authed_json_request(
        app,
        "POST",
        "/api/lesson",
        &token,
        Some(lesson_body("Algebra")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["title"], "Algebra");
    assert_eq!(body["status"], "PENDING");
    assert!(body["id"].is_number());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_lesson_requires_auth(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let response = json_request(app, "POST", "/api/lesson", lesson_body("Algebra")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_lessons_paginated(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = register_teacher(app.clone(), "t@x.com").await;

    for i in 0..3 {
        let response = authed_json_request(
            app.clone(),
            "POST",
            "/api/lesson",
            &token,
            Some(json!({
                "title": format!("Lesson {}", i),
                "startTime": format!("2026-09-0{}T10:00:00Z", i + 1),
                "endTime": format!("2026-09-0{}T11:00:00Z", i + 1)
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = authed_json_request(
        app,
        "GET",
        "/api/lesson/teacher?limit=2&offset=0",
        &token,
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["has_more"], true);
    // Most recent start time first.
    assert_eq!(body["data"][0]["title"], "Lesson 2");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_lesson_resets_status(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = register_teacher(app.clone(), "t@x.com").await;

    let created = authed_json_request(
        app.clone(),
        "POST",
        "/api/lesson",
        &token,
        Some(lesson_body("Algebra")),
    )
    .await;
    let created = response_json(created).await;
    let lesson_id = created["id"].as_i64().unwrap();

    // Mark as already reminded, as the scheduler would.
    sqlx::query("UPDATE lessons SET status = 'sent' WHERE id = $1")
        .bind(lesson_id as i32)
        .execute(&pool)
        .await
        .unwrap();

    let response = authed_json_request(
        app,
        "PUT",
        &format!("/api/lesson/{}", lesson_id),
        &token,
        Some(json!({ "title": "Algebra II" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["title"], "Algebra II");
    assert_eq!(body["status"], "PENDING");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lessons_are_scoped_to_owner(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let owner_token = register_teacher(app.clone(), "owner@x.com").await;
    let other_token = register_teacher(app.clone(), "other@x.com").await;

    let created = authed_json_request(
        app.clone(),
        "POST",
        "/api/lesson",
        &owner_token,
        Some(lesson_body("Private")),
    )
    .await;
    let created = response_json(created).await;
    let lesson_id = created["id"].as_i64().unwrap();

    let response = authed_json_request(
        app.clone(),
        "GET",
        &format!("/api/lesson/{}", lesson_id),
        &other_token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = authed_json_request(
        app,
        "GET",
        &format!("/api/lesson/{}", lesson_id),
        &owner_token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_lesson(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = register_teacher(app.clone(), "t@x.com").await;

    let created = authed_json_request(
        app.clone(),
        "POST",
        "/api/lesson",
        &token,
        Some(lesson_body("Doomed")),
    )
    .await;
    let created = response_json(created).await;
    let lesson_id = created["id"].as_i64().unwrap();

    let response = authed_json_request(
        app.clone(),
        "DELETE",
        &format!("/api/lesson/{}", lesson_id),
        &token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = authed_json_request(
        app,
        "GET",
        &format!("/api/lesson/{}", lesson_id),
        &token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
