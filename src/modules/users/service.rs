use sqlx::PgPool;
use tracing::instrument;

use crate::utils::errors::AppError;

use super::model::{UpdateProfileDto, User};

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_by_email(db: &PgPool, email: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, bio, subject, role, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        Ok(user)
    }

    /// Applies a partial profile update for the user identified by email.
    /// Timestamps are stamped here, in the save path.
    #[instrument(skip(db))]
    pub async fn update_profile(
        db: &PgPool,
        email: &str,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        let existing = Self::get_by_email(db, email).await?;

        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let bio = dto.bio.or(existing.bio);
        let subject = dto.subject.or(existing.subject);

        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET first_name = $1, last_name = $2, bio = $3, subject = $4, updated_at = NOW()
             WHERE id = $5
             RETURNING id, first_name, last_name, email, bio, subject, role, created_at, updated_at",
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(&bio)
        .bind(&subject)
        .bind(existing.id)
        .fetch_one(db)
        .await?;

        Ok(user)
    }
}
