use crate::errors::AppError;
use crate::ingest::apply_status_update;
use crate::models::{
    CategoryQuery, ChartPoint, Goal, GoalStats, OverviewResponse, SyncStatusResponse,
    TextIngestRequest, TimeProgress,
};
use crate::state::AppState;
use crate::stats::{build_overview, compute_chart_data, compute_stats, compute_time_progress, filter_by_category};
use crate::storage::persist_goals;
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    Json,
};
use chrono::Utc;
use tracing::{debug, info};

pub async fn get_goals(
    State(state): State<AppState>,
    query: Result<Query<CategoryQuery>, QueryRejection>,
) -> Result<Json<Vec<Goal>>, AppError> {
    let Query(query) = query.map_err(|err| AppError::bad_request(err.body_text()))?;
    let goals = state.goals.lock().await;
    Ok(Json(filter_by_category(&goals, query.category)))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<GoalStats>, AppError> {
    let goals = state.goals.lock().await;
    Ok(Json(compute_stats(&goals)))
}

pub async fn get_chart(
    State(state): State<AppState>,
    query: Result<Query<CategoryQuery>, QueryRejection>,
) -> Result<Json<Vec<ChartPoint>>, AppError> {
    let Query(query) = query.map_err(|err| AppError::bad_request(err.body_text()))?;
    let goals = state.goals.lock().await;
    Ok(Json(compute_chart_data(&filter_by_category(&goals, query.category))))
}

pub async fn get_time(State(state): State<AppState>) -> Json<TimeProgress> {
    Json(compute_time_progress(state.window.start, state.window.end, Utc::now()))
}

pub async fn get_overview(State(state): State<AppState>) -> Json<OverviewResponse> {
    let goals = state.goals.lock().await;
    Json(build_overview(&goals, state.window))
}

pub async fn get_sync_status(State(state): State<AppState>) -> Json<SyncStatusResponse> {
    Json(SyncStatusResponse {
        syncing: state.is_syncing(),
    })
}

pub async fn ingest_text(
    State(state): State<AppState>,
    Json(payload): Json<TextIngestRequest>,
) -> Result<Json<Vec<Goal>>, AppError> {
    let mut goals = state.goals.lock().await;
    let updated = apply_status_update(&goals, &payload.text).inspect_err(|err| {
        debug!("status update rejected: {err}");
    })?;

    persist_goals(&state.data_path, &updated).await?;
    *goals = updated;
    info!(count = goals.len(), "applied status update");

    Ok(Json(goals.clone()))
}

pub async fn sync(State(state): State<AppState>) -> Result<Json<Vec<Goal>>, AppError> {
    let _guard = state.begin_sync()?;
    let fetched = state.sheets.fetch_goals().await.inspect_err(|err| {
        debug!("sheet sync failed: {err}");
    })?;

    let mut goals = state.goals.lock().await;
    persist_goals(&state.data_path, &fetched).await?;
    *goals = fetched;
    info!(count = goals.len(), "replaced goals from sheet");

    Ok(Json(goals.clone()))
}
