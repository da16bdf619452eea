//! Story gallery pipeline: fetch → normalize → view → render

pub mod detail;
pub mod normalize;
pub mod render;
pub mod view;

pub use normalize::Story;
pub use view::{apply_view, ViewState};

use ccmp_common::airtable::{ListQuery, RecordStore, RemoteError};
use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::SiteSettings;

/// Result of loading the story collection for one page
#[derive(Debug)]
pub enum LoadOutcome {
    /// At least one story was fetched
    Loaded(Vec<Story>),
    /// The table returned no records
    Empty,
    /// The remote call failed; the page shows its empty state
    Failed(RemoteError),
}

impl LoadOutcome {
    /// Stories to render (empty unless loaded)
    pub fn stories(&self) -> &[Story] {
        match self {
            LoadOutcome::Loaded(stories) => stories,
            LoadOutcome::Empty | LoadOutcome::Failed(_) => &[],
        }
    }
}

/// Fetch and normalize the story collection
pub async fn load_stories(
    store: &dyn RecordStore,
    settings: &SiteSettings,
    now: DateTime<Utc>,
) -> LoadOutcome {
    let query = ListQuery {
        max_records: Some(settings.max_records),
        view: Some(settings.view.clone()),
    };

    match store.list(&settings.tables.coffee_stories, &query).await {
        Ok(records) if records.is_empty() => {
            info!("Story table is empty");
            LoadOutcome::Empty
        }
        Ok(records) => {
            let stories = normalize::normalize_records(&records, now);
            info!(count = stories.len(), "Loaded stories");
            LoadOutcome::Loaded(stories)
        }
        Err(e) => {
            error!("Error loading stories: {}", e);
            LoadOutcome::Failed(e)
        }
    }
}
