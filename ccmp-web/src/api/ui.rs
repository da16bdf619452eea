//! Page and static asset routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use uuid::Uuid;

use crate::gallery::{load_stories, LoadOutcome, ViewState};
use crate::{pages, AppState};

const APP_JS: &str = include_str!("../ui/app.js");
const SITE_CSS: &str = include_str!("../ui/site.css");

/// Fresh identity for one rendered form instance
fn new_form_token() -> String {
    Uuid::new_v4().to_string()
}

/// GET /
pub async fn home_page(State(state): State<AppState>) -> Html<String> {
    Html(pages::home_page(&state.settings.stats, &state.bindings))
}

/// GET /apply
pub async fn apply_page(State(state): State<AppState>) -> Html<String> {
    Html(pages::apply_page(&new_form_token(), &state.bindings))
}

/// GET /stories?tag=..&q=..
///
/// Loads the collection on every request. A failed load still renders the
/// page, in its empty state.
pub async fn stories_page(
    State(state): State<AppState>,
    Query(view): Query<ViewState>,
) -> Html<String> {
    let outcome = load_stories(state.store.as_ref(), &state.settings, ccmp_common::time::now()).await;
    if let LoadOutcome::Failed(ref e) = outcome {
        state.record_error(format!("story listing: {}", e)).await;
    }

    Html(pages::stories_page(&outcome, &view, &new_form_token(), &state.bindings))
}

/// GET /static/app.js
///
/// Serves the page script
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// GET /static/site.css
pub async fn serve_site_css() -> Response {
    (StatusCode::OK, [("content-type", "text/css")], SITE_CSS).into_response()
}
