use sqlx::PgPool;
use tracing::instrument;

use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

use super::model::{
    CreateLessonDto, Lesson, LessonFilterParams, PaginatedLessonsResponse, UpdateLessonDto,
};

pub struct LessonService;

impl LessonService {
    #[instrument(skip(db, dto))]
    pub async fn create_lesson(
        db: &PgPool,
        teacher_id: i32,
        dto: CreateLessonDto,
    ) -> Result<Lesson, AppError> {
        if dto.end_time <= dto.start_time {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "End time must be after start time"
            )));
        }

        let lesson = sqlx::query_as::<_, Lesson>(
            "INSERT INTO lessons (teacher_id, title, description, start_time, end_time)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, teacher_id, title, description, start_time, end_time, status, created_at, updated_at",
        )
        .bind(teacher_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .fetch_one(db)
        .await?;

        Ok(lesson)
    }

    /// Paginated list of the teacher's lessons, most recent start first.
    #[instrument(skip(db))]
    pub async fn get_lessons_for_teacher(
        db: &PgPool,
        teacher_id: i32,
        filters: LessonFilterParams,
    ) -> Result<PaginatedLessonsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM lessons WHERE teacher_id = $1")
                .bind(teacher_id)
                .fetch_one(db)
                .await?;

        let lessons = sqlx::query_as::<_, Lesson>(
            "SELECT id, teacher_id, title, description, start_time, end_time, status, created_at, updated_at
             FROM lessons
             WHERE teacher_id = $1
             ORDER BY start_time DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(teacher_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        let has_more = offset + limit < total;

        Ok(PaginatedLessonsResponse {
            data: lessons,
            meta: PaginationMeta {
                total,
                limit,
                offset,
                has_more,
            },
        })
    }

    #[instrument(skip(db))]
    pub async fn get_lesson_by_id(
        db: &PgPool,
        lesson_id: i32,
        teacher_id: i32,
    ) -> Result<Lesson, AppError> {
        let lesson = sqlx::query_as::<_, Lesson>(
            "SELECT id, teacher_id, title, description, start_time, end_time, status, created_at, updated_at
             FROM lessons WHERE id = $1 AND teacher_id = $2",
        )
        .bind(lesson_id)
        .bind(teacher_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson not found")))?;

        Ok(lesson)
    }

    /// Partial update of a lesson owned by the teacher.
    ///
    /// Every edit resets `status` to PENDING: the content changed, so the
    /// previous reminder (if any) no longer covers it. `updated_at` is
    /// stamped here, which also invalidates any dispatch that read the row
    /// before this edit.
    #[instrument(skip(db, dto))]
    pub async fn update_lesson(
        db: &PgPool,
        lesson_id: i32,
        teacher_id: i32,
        dto: UpdateLessonDto,
    ) -> Result<Lesson, AppError> {
        let existing = Self::get_lesson_by_id(db, lesson_id, teacher_id).await?;

        let title = dto.title.unwrap_or(existing.title);
        let description = dto.description.or(existing.description);
        let start_time = dto.start_time.unwrap_or(existing.start_time);
        let end_time = dto.end_time.unwrap_or(existing.end_time);

        if end_time <= start_time {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "End time must be after start time"
            )));
        }

        let lesson = sqlx::query_as::<_, Lesson>(
            "UPDATE lessons
             SET title = $1, description = $2, start_time = $3, end_time = $4,
                 status = 'pending', updated_at = NOW()
             WHERE id = $5 AND teacher_id = $6
             RETURNING id, teacher_id, title, description, start_time, end_time, status, created_at, updated_at",
        )
        .bind(&title)
        .bind(&description)
        .bind(start_time)
        .bind(end_time)
        .bind(lesson_id)
        .bind(teacher_id)
        .fetch_one(db)
        .await?;

        Ok(lesson)
    }

    #[instrument(skip(db))]
    pub async fn delete_lesson(
        db: &PgPool,
        lesson_id: i32,
        teacher_id: i32,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1 AND teacher_id = $2")
            .bind(lesson_id)
            .bind(teacher_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Lesson not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};

    use crate::modules::lessons::model::LessonStatus;
    use crate::utils::pagination::PaginationParams;
    use crate::utils::password::hash_password;

    async fn insert_teacher(pool: &PgPool, email: &str) -> i32 {
        let hashed = hash_password("testpass123").unwrap();
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO users (first_name, last_name, email, password)
             VALUES ('Test', 'Teacher', $1, $2)
             RETURNING id",
        )
        .bind(email)
        .bind(&hashed)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn lesson_dto(title: &str, starts_in_mins: i64) -> CreateLessonDto {
        let start = Utc::now() + Duration::minutes(starts_in_mins);
        CreateLessonDto {
            title: title.to_string(),
            description: Some("desc".to_string()),
            start_time: start,
            end_time: start + Duration::hours(1),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_lesson_starts_pending(pool: PgPool) {
        let teacher_id = insert_teacher(&pool, "t1@test.com").await;

        let lesson = LessonService::create_lesson(&pool, teacher_id, lesson_dto("Algebra", 60))
            .await
            .unwrap();

        assert_eq!(lesson.status, LessonStatus::Pending);
        assert_eq!(lesson.teacher_id, teacher_id);
        assert_eq!(lesson.title, "Algebra");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_lesson_rejects_inverted_times(pool: PgPool) {
        let teacher_id = insert_teacher(&pool, "t1@test.com").await;

        let start = Utc::now() + Duration::hours(1);
        let dto = CreateLessonDto {
            title: "Backwards".to_string(),
            description: None,
            start_time: start,
            end_time: start - Duration::minutes(30),
        };

        let err = LessonService::create_lesson(&pool, teacher_id, dto)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_resets_status_to_pending(pool: PgPool) {
        let teacher_id = insert_teacher(&pool, "t1@test.com").await;
        let lesson = LessonService::create_lesson(&pool, teacher_id, lesson_dto("Algebra", 60))
            .await
            .unwrap();

        // Simulate a dispatched reminder.
        sqlx::query("UPDATE lessons SET status = 'sent' WHERE id = $1")
            .bind(lesson.id)
            .execute(&pool)
            .await
            .unwrap();

        let dto = UpdateLessonDto {
            title: Some("Algebra II".to_string()),
            description: None,
            start_time: None,
            end_time: None,
        };
        let updated = LessonService::update_lesson(&pool, lesson.id, teacher_id, dto)
            .await
            .unwrap();

        assert_eq!(updated.title, "Algebra II");
        assert_eq!(updated.status, LessonStatus::Pending);
        assert!(updated.updated_at > lesson.updated_at);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_lessons_are_owner_scoped(pool: PgPool) {
        let owner = insert_teacher(&pool, "owner@test.com").await;
        let other = insert_teacher(&pool, "other@test.com").await;
        let lesson = LessonService::create_lesson(&pool, owner, lesson_dto("Private", 60))
            .await
            .unwrap();

        let err = LessonService::get_lesson_by_id(&pool, lesson.id, other)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = LessonService::delete_lesson(&pool, lesson.id, other)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        LessonService::delete_lesson(&pool, lesson.id, owner)
            .await
            .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_pagination_newest_start_first(pool: PgPool) {
        let teacher_id = insert_teacher(&pool, "t1@test.com").await;

        for i in 0..4 {
            LessonService::create_lesson(
                &pool,
                teacher_id,
                lesson_dto(&format!("Lesson {}", i), 60 + i * 30),
            )
            .await
            .unwrap();
        }

        let filters = LessonFilterParams {
            pagination: PaginationParams {
                limit: Some(2),
                offset: Some(0),
            },
        };
        let page = LessonService::get_lessons_for_teacher(&pool, teacher_id, filters)
            .await
            .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.meta.total, 4);
        assert!(page.meta.has_more);
        // Latest start time comes first.
        assert_eq!(page.data[0].title, "Lesson 3");
        assert!(page.data[0].start_time > page.data[1].start_time);
    }
}
