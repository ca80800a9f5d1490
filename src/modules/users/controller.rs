use axum::{Json, extract::State};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{UpdateProfileDto, User};
use super::service::UserService;

/// Get the logged-in teacher's profile
#[utoipa::path(
    get,
    path = "/api/teacher",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = User),
        (status = 401, description = "Unauthorized - missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_by_email(&state.db, auth_user.email()).await?;
    Ok(Json(user))
}

/// Update the logged-in teacher's profile
#[utoipa::path(
    put,
    path = "/api/teacher",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated successfully", body = User),
        (status = 401, description = "Unauthorized - missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
#[instrument(skip(state))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_profile(&state.db, auth_user.email(), dto).await?;
    Ok(Json(user))
}
