use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
use crate::modules::lessons::model::{
    CreateLessonDto, Lesson, LessonStatus, PaginatedLessonsResponse, UpdateLessonDto,
};
use crate::modules::users::model::{UpdateProfileDto, User, UserRole};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::lessons::controller::create_lesson,
        crate::modules::lessons::controller::get_lessons_for_teacher,
        crate::modules::lessons::controller::get_lesson_by_id,
        crate::modules::lessons::controller::update_lesson,
        crate::modules::lessons::controller::delete_lesson,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            AuthResponse,
            ErrorResponse,
            User,
            UserRole,
            UpdateProfileDto,
            Lesson,
            LessonStatus,
            CreateLessonDto,
            UpdateLessonDto,
            PaginatedLessonsResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, and token refresh"),
        (name = "Teacher", description = "Teacher profile management"),
        (name = "Lessons", description = "Lesson scheduling for the logged-in teacher")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
