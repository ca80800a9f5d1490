use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_lesson, delete_lesson, get_lesson_by_id, get_lessons_for_teacher, update_lesson,
};

pub fn init_lessons_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_lesson))
        .route("/teacher", get(get_lessons_for_teacher))
        .route(
            "/{lesson_id}",
            get(get_lesson_by_id)
                .put(update_lesson)
                .delete(delete_lesson),
        )
}
