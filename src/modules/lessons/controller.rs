use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    CreateLessonDto, Lesson, LessonFilterParams, PaginatedLessonsResponse, UpdateLessonDto,
};
use super::service::LessonService;

/// Create a new lesson for the logged-in teacher
#[utoipa::path(
    post,
    path = "/api/lesson",
    request_body = CreateLessonDto,
    responses(
        (status = 201, description = "Lesson created successfully", body = Lesson),
        (status = 400, description = "Invalid lesson data"),
        (status = 401, description = "Unauthorized - missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, dto))]
pub async fn create_lesson(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateLessonDto>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    let teacher = UserService::get_by_email(&state.db, auth_user.email()).await?;
    let lesson = LessonService::create_lesson(&state.db, teacher.id, dto).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

/// List the logged-in teacher's lessons
#[utoipa::path(
    get,
    path = "/api/lesson/teacher",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, 1-100, default 10"),
        ("offset" = Option<i64>, Query, description = "Number of lessons to skip")
    ),
    responses(
        (status = 200, description = "Lessons retrieved successfully", body = PaginatedLessonsResponse),
        (status = 401, description = "Unauthorized - missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state))]
pub async fn get_lessons_for_teacher(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<LessonFilterParams>,
) -> Result<Json<PaginatedLessonsResponse>, AppError> {
    let teacher = UserService::get_by_email(&state.db, auth_user.email()).await?;
    let lessons = LessonService::get_lessons_for_teacher(&state.db, teacher.id, filters).await?;
    Ok(Json(lessons))
}

/// Get one of the logged-in teacher's lessons by ID
#[utoipa::path(
    get,
    path = "/api/lesson/{lesson_id}",
    params(("lesson_id" = i32, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson retrieved successfully", body = Lesson),
        (status = 401, description = "Unauthorized - missing or invalid token"),
        (status = 404, description = "Lesson not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state))]
pub async fn get_lesson_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(lesson_id): Path<i32>,
) -> Result<Json<Lesson>, AppError> {
    let teacher = UserService::get_by_email(&state.db, auth_user.email()).await?;
    let lesson = LessonService::get_lesson_by_id(&state.db, lesson_id, teacher.id).await?;
    Ok(Json(lesson))
}

/// Update a lesson; the edit resets its reminder status to PENDING
#[utoipa::path(
    put,
    path = "/api/lesson/{lesson_id}",
    params(("lesson_id" = i32, Path, description = "Lesson ID")),
    request_body = UpdateLessonDto,
    responses(
        (status = 200, description = "Lesson updated successfully", body = Lesson),
        (status = 400, description = "Invalid lesson data"),
        (status = 401, description = "Unauthorized - missing or invalid token"),
        (status = 404, description = "Lesson not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, dto))]
pub async fn update_lesson(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(lesson_id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateLessonDto>,
) -> Result<Json<Lesson>, AppError> {
    let teacher = UserService::get_by_email(&state.db, auth_user.email()).await?;
    let lesson = LessonService::update_lesson(&state.db, lesson_id, teacher.id, dto).await?;
    Ok(Json(lesson))
}

/// Delete a lesson
#[utoipa::path(
    delete,
    path = "/api/lesson/{lesson_id}",
    params(("lesson_id" = i32, Path, description = "Lesson ID")),
    responses(
        (status = 204, description = "Lesson deleted successfully"),
        (status = 401, description = "Unauthorized - missing or invalid token"),
        (status = 404, description = "Lesson not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(lesson_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let teacher = UserService::get_by_email(&state.db, auth_user.email()).await?;
    LessonService::delete_lesson(&state.db, lesson_id, teacher.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
