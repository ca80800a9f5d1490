use sqlx::PgPool;
use tracing::{instrument, warn};

use crate::config::email::EmailConfig;
use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{User, UserRole};
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::utils::jwt::{create_access_token, create_refresh_token, decode_token, verify_subject};
use crate::utils::password::{hash_password, verify_password};

use super::model::{AuthResponse, LoginRequest, RegisterRequest};

pub struct AuthService;

impl AuthService {
    /// Registers a new teacher and returns both token kinds.
    ///
    /// The `existsByEmail` pre-check gives a friendly error on the common
    /// path; the unique constraint on `users.email` is what actually
    /// guarantees that two concurrent registrations cannot both succeed.
    #[instrument(skip(db, dto, email_config), fields(email = %dto.email))]
    pub async fn register(
        db: &PgPool,
        dto: RegisterRequest,
        jwt_config: &JwtConfig,
        email_config: &EmailConfig,
    ) -> Result<AuthResponse, AppError> {
        if dto.password.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Password is required"
            )));
        }
        if dto.email.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!("Email is required")));
        }

        let email_taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&dto.email)
                .fetch_one(db)
                .await?;

        if email_taken {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Email is already registered"
            )));
        }

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (first_name, last_name, email, password)
             VALUES ($1, $2, $3, $4)
             RETURNING id, first_name, last_name, email, bio, subject, role, created_at, updated_at",
        )
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!("Email is already registered"));
            }
            AppError::from(e)
        })?;

        // Signup notifications are best-effort: a delivery failure must not
        // fail the registration that already happened.
        let mailer = EmailService::new(email_config.clone());
        let full_name = format!("{} {}", user.first_name, user.last_name);
        if let Err(err) = mailer.send_welcome_email(&user.email, &full_name).await {
            warn!(email = %user.email, error = %err.error, "Failed to send welcome email");
        }
        if let Err(err) = mailer.send_admin_notification(&user.email, &full_name).await {
            warn!(email = %user.email, error = %err.error, "Failed to send admin notification");
        }

        let token = create_access_token(&user.email, jwt_config)?;
        let refresh_token = create_refresh_token(&user.email, jwt_config)?;

        Ok(AuthResponse {
            token,
            refresh_token,
            role: user.role,
            user_data: None,
            message: "Registration successful".to_string(),
            success: true,
        })
    }

    /// Authenticates by email and password.
    ///
    /// A missing user and a wrong password produce the same error so callers
    /// cannot enumerate registered emails.
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: i32,
            first_name: String,
            last_name: String,
            email: String,
            bio: Option<String>,
            subject: Option<String>,
            role: UserRole,
            password: String,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let user_with_password = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, first_name, last_name, email, bio, subject, role, password, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Invalid email or password")))?;

        let is_valid = verify_password(&dto.password, &user_with_password.password)?;

        if !is_valid {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid email or password"
            )));
        }

        let token = create_access_token(&user_with_password.email, jwt_config)?;
        let refresh_token = create_refresh_token(&user_with_password.email, jwt_config)?;

        let user = User {
            id: user_with_password.id,
            first_name: user_with_password.first_name,
            last_name: user_with_password.last_name,
            email: user_with_password.email,
            bio: user_with_password.bio,
            subject: user_with_password.subject,
            role: user_with_password.role,
            created_at: user_with_password.created_at,
            updated_at: user_with_password.updated_at,
        };

        Ok(AuthResponse {
            token,
            refresh_token,
            role: user.role,
            user_data: Some(user),
            message: "Login successful".to_string(),
            success: true,
        })
    }

    /// Exchanges a valid refresh token for a new access token.
    ///
    /// The refresh token itself is returned unchanged; rotation is a
    /// deliberate non-feature of this design.
    #[instrument(skip(db, refresh_token))]
    pub async fn refresh(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let claims = decode_token(refresh_token, jwt_config).map_err(AppError::unauthorized)?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, bio, subject, role, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(&claims.sub)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if !verify_subject(refresh_token, &user.email, jwt_config) {
            return Err(AppError::unauthorized(anyhow::anyhow!("Invalid token")));
        }

        let token = create_access_token(&user.email, jwt_config)?;

        Ok(AuthResponse {
            token,
            refresh_token: refresh_token.to_string(),
            role: user.role,
            user_data: None,
            message: "Token refreshed successfully".to_string(),
            success: true,
        })
    }
}
