use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_profile, update_profile};

pub fn init_teacher_router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}
