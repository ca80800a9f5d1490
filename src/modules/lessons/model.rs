use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// Reminder state of a lesson.
///
/// The only transitions are PENDING → SENT (performed by the reminder
/// scheduler after a successful dispatch) and SENT → PENDING (performed by a
/// lesson edit, meaning "new content, needs a fresh reminder").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lesson_status", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum LessonStatus {
    Pending,
    Sent,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: i32,
    pub teacher_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: LessonStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonDto {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Partial lesson update. Whatever subset of fields is supplied, the edit
/// resets the reminder status back to PENDING.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLessonDto {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LessonFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedLessonsResponse {
    pub data: Vec<Lesson>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&LessonStatus::Pending).unwrap(),
            r#""PENDING""#
        );
        assert_eq!(
            serde_json::to_string(&LessonStatus::Sent).unwrap(),
            r#""SENT""#
        );
    }

    #[test]
    fn test_create_lesson_dto_deserialize() {
        let dto: CreateLessonDto = serde_json::from_str(
            r#"{
                "title": "Algebra II",
                "description": "Quadratic equations",
                "startTime": "2026-08-07T10:00:00Z",
                "endTime": "2026-08-07T11:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(dto.title, "Algebra II");
        assert!(dto.end_time > dto.start_time);
    }

    #[test]
    fn test_update_lesson_dto_validation() {
        use validator::Validate;

        let dto: UpdateLessonDto = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(dto.validate().is_err());

        let dto: UpdateLessonDto = serde_json::from_str(r#"{}"#).unwrap();
        assert!(dto.validate().is_ok());
    }
}
