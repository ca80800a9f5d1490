use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{login_user, refresh_token, register_user};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/refresh-token", post(refresh_token))
}
