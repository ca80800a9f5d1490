use sqlx::PgPool;
use std::env;

/// Initializes the PostgreSQL connection pool from `DATABASE_URL`.
///
/// Called once during startup; the returned pool is cheaply cloneable and
/// shared through the application state.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset or the connection cannot be established.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
