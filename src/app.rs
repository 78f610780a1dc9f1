use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/overview", get(handlers::get_overview))
        .route("/api/goals", get(handlers::get_goals))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/chart", get(handlers::get_chart))
        .route("/api/time", get(handlers::get_time))
        .route("/api/ingest/text", post(handlers::ingest_text))
        .route("/api/sync", post(handlers::sync))
        .route("/api/sync/status", get(handlers::get_sync_status))
        .with_state(state)
}
