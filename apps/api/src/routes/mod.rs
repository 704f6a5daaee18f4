pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::boards::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/boards", post(handlers::handle_compose))
        .route("/api/v1/boards/plan", post(handlers::handle_plan))
        .route("/api/v1/boards/layout", post(handlers::handle_layout))
        .with_state(state)
}
