//! Search trigger handler.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub keyword: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub keyword: String,
    pub titles: usize,
    pub records: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// POST /api/v1/search
///
/// Runs the full aggregator pipeline for the keyword and replaces the
/// merged catalog. Destructive: the previous search's cache files are
/// purged first. Pipelines are serialized; a second request waits for
/// the running one to finish.
pub async fn run_search(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, impl IntoResponse> {
    let keyword = body.keyword.trim();
    if keyword.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing keyword".to_string(),
            }),
        ));
    }

    let _guard = state.search_lock().lock().await;

    info!(keyword, "Search started");
    match state.aggregator().search(keyword).await {
        Ok(merged) => {
            let titles = merged.title_count();
            let records = merged.total_records();

            state.replace_catalog(merged).await;
            state.record_search(keyword).await;

            info!(keyword, titles, records, "Search completed");
            Ok(Json(SearchResponse {
                keyword: keyword.to_string(),
                titles,
                records,
            }))
        }
        Err(e) => {
            // The previous catalog stays in place on a failed pipeline.
            error!(keyword, error = %e, "Search failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
