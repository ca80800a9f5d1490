use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use timetable_api::config::cors::CorsConfig;
use timetable_api::config::email::EmailConfig;
use timetable_api::config::jwt::JwtConfig;
use timetable_api::config::scheduler::SchedulerConfig;
use timetable_api::router::init_router;
use timetable_api::state::AppState;
use timetable_api::utils::password::hash_password;

pub fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        scheduler_config: SchedulerConfig::from_env(),
    };
    init_router(state)
}

/// Inserts a teacher directly, bypassing the registration endpoint.
#[allow(dead_code)]
pub async fn create_test_teacher(pool: &PgPool, email: &str, password: &str) -> i32 {
    let hashed = hash_password(password).unwrap();

    sqlx::query_scalar::<_, i32>(
        "INSERT INTO users (first_name, last_name, email, password)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind("Test")
    .bind("Teacher")
    .bind(email)
    .bind(&hashed)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn json_request(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    app.oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn authed_json_request(
    app: Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    let request = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            builder
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    app.oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
