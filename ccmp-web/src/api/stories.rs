//! Story collection as JSON

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::gallery::view::available_tags;
use crate::gallery::{load_stories, LoadOutcome, Story, ViewState};
use crate::AppState;

/// Response for GET /api/stories
#[derive(Debug, Serialize)]
pub struct StoriesResponse {
    pub filter: String,
    pub search: String,
    /// Size of the whole collection, before the view is applied
    pub total: usize,
    /// Tags present anywhere in the collection
    pub tags: Vec<String>,
    pub stories: Vec<Story>,
}

/// GET /api/stories?tag=..&q=..
///
/// Unlike the gallery page, a failed load is reported as an error here.
pub async fn list_stories(
    State(state): State<AppState>,
    Query(view): Query<ViewState>,
) -> ApiResult<Json<StoriesResponse>> {
    let outcome = load_stories(state.store.as_ref(), &state.settings, ccmp_common::time::now()).await;

    let all = match outcome {
        LoadOutcome::Loaded(stories) => stories,
        LoadOutcome::Empty => Vec::new(),
        LoadOutcome::Failed(e) => {
            state.record_error(format!("story listing: {}", e)).await;
            return Err(ApiError::Upstream(e));
        }
    };

    Ok(Json(StoriesResponse {
        total: all.len(),
        tags: available_tags(&all),
        stories: view.apply(&all),
        filter: view.filter,
        search: view.search,
    }))
}
