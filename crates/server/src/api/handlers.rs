use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use vodpool_core::SanitizedConfig;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub sources: usize,
    pub titles: usize,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_search_keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_search_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let catalog = state.catalog().await;
    let last = state.last_search().await;

    Json(StatusResponse {
        sources: state.sites().len(),
        titles: catalog.title_count(),
        records: catalog.total_records(),
        last_search_keyword: last.as_ref().map(|l| l.keyword.clone()),
        last_search_at: last.map(|l| l.at),
    })
}
