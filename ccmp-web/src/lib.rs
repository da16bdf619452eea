//! ccmp-web library - coffee chat mentorship site
//!
//! Story gallery backed by the remote record store, plus the application and
//! story submission forms.

use axum::Router;
use ccmp_common::airtable::RecordStore;
use ccmp_common::config::{SiteStats, TableNames, TomlConfig};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod api;
pub mod bindings;
pub mod error;
pub mod gallery;
pub mod pages;
pub mod submission;

use bindings::BindingTable;
use submission::InFlightForms;

/// Settings the handlers need from the loaded configuration
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub tables: TableNames,
    /// View used when listing stories
    pub view: String,
    pub max_records: u32,
    pub stats: SiteStats,
    /// Optional static asset directory served as the router fallback
    pub site_dir: Option<PathBuf>,
}

impl SiteSettings {
    pub fn from_config(config: &TomlConfig) -> Self {
        Self {
            tables: config.airtable.tables.clone(),
            view: config.airtable.view.clone(),
            max_records: config.airtable.max_records,
            stats: config.site.stats.clone(),
            site_dir: config.server.site_dir.clone(),
        }
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Remote record store
    pub store: Arc<dyn RecordStore>,
    pub settings: Arc<SiteSettings>,
    /// Event bindings embedded in every page
    pub bindings: Arc<BindingTable>,
    /// Form tokens with a submission in flight
    pub in_flight: InFlightForms,
    pub startup_time: DateTime<Utc>,
    /// Most recent remote failure, reported by `/health`
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<dyn RecordStore>, settings: SiteSettings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
            bindings: Arc::new(BindingTable::site()),
            in_flight: InFlightForms::default(),
            startup_time: ccmp_common::time::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Remember a remote failure for health reporting
    pub async fn record_error(&self, message: impl Into<String>) {
        *self.last_error.write().await = Some(message.into());
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};
    use tower_http::services::ServeDir;
    use tower_http::trace::TraceLayer;

    let site_dir = state.settings.site_dir.clone();

    let pages = Router::new()
        .route("/", get(api::home_page))
        .route("/apply", get(api::apply_page))
        .route("/stories", get(api::stories_page))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/static/site.css", get(api::serve_site_css));

    let json = Router::new()
        .route("/api/stories", get(api::list_stories))
        .route("/api/applications", post(api::post_application))
        .route("/api/story-submissions", post(api::post_story_submission));

    let router = Router::new()
        .merge(pages)
        .merge(json)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match site_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}
