//! Read-only catalog query handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use vodpool_core::VideoRecord;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct VideoListResponse {
    /// Title -> records contributed by each source.
    pub videos: BTreeMap<String, Vec<VideoRecord>>,
    pub titles: usize,
    pub records: usize,
}

#[derive(Debug, Serialize)]
pub struct VideoSearchResponse {
    pub results: Vec<VideoRecord>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct SourceEntry {
    pub id: String,
    pub name: String,
    pub api: String,
}

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<SourceEntry>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/videos
///
/// The full merged catalog, grouped by title.
pub async fn list_videos(State(state): State<Arc<AppState>>) -> Json<VideoListResponse> {
    let catalog = state.catalog().await;

    Json(VideoListResponse {
        titles: catalog.title_count(),
        records: catalog.total_records(),
        videos: catalog.by_title().clone(),
    })
}

/// GET /api/v1/videos/{id}
///
/// First record with this id across the merged set. Ids are only
/// unique per source, so this is a convenience lookup.
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<VideoRecord>, impl IntoResponse> {
    let catalog = state.catalog().await;

    match catalog.get_by_id(id) {
        Some(record) => Ok(Json(record.clone())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("No video with id {}", id),
            }),
        )),
    }
}

/// GET /api/v1/videos/search?q=...
///
/// Substring search over the current merged catalog only; does not
/// touch the source APIs.
pub async fn search_videos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<VideoSearchResponse> {
    let catalog = state.catalog().await;
    let results: Vec<VideoRecord> = catalog.search(&params.q).into_iter().cloned().collect();

    Json(VideoSearchResponse {
        total: results.len(),
        results,
    })
}

/// GET /api/v1/categories
///
/// Category counts aggregated across every source's records.
pub async fn get_categories(State(state): State<Arc<AppState>>) -> Json<CategoriesResponse> {
    let catalog = state.catalog().await;

    Json(CategoriesResponse {
        categories: catalog.category_statistics(),
    })
}

/// GET /api/v1/sources
///
/// The configured source sites.
pub async fn list_sources(State(state): State<Arc<AppState>>) -> Json<SourcesResponse> {
    let sources = state
        .sites()
        .iter()
        .map(|(id, site)| SourceEntry {
            id: id.to_string(),
            name: site.name.clone(),
            api: site.api.clone(),
        })
        .collect();

    Json(SourcesResponse { sources })
}
