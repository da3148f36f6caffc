pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs", get(handlers::handle_list_jobs))
        .route("/api/v1/jobs/:id", get(handlers::handle_get_job))
        .route("/api/v1/applicants", get(handlers::handle_list_applicants))
        .route("/api/v1/evaluate", post(handlers::handle_evaluate))
        .route(
            "/api/v1/jobs/:id/categorize",
            post(handlers::handle_categorize_job),
        )
        .route(
            "/api/v1/applicants/categorize",
            post(handlers::handle_categorize_all),
        )
        .with_state(state)
}
