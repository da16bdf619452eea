//! Tag filtering and text search over the story collection
//!
//! Views are always recomputed from the full collection. Search composes with
//! the active tag filter through [`apply_view`], never with a previous view.

use serde::Deserialize;

use super::normalize::Story;

/// Filter value selecting every story
pub const ALL_TAGS: &str = "all";

/// Active filter and search term of a gallery page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewState {
    /// Tag filter (`"all"` when absent)
    #[serde(default = "default_filter", rename = "tag")]
    pub filter: String,

    /// Search term (empty when absent)
    #[serde(default, rename = "q")]
    pub search: String,
}

fn default_filter() -> String {
    ALL_TAGS.to_string()
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            search: String::new(),
        }
    }
}

impl ViewState {
    /// Compute the visible stories for this state
    pub fn apply(&self, stories: &[Story]) -> Vec<Story> {
        apply_view(stories, &self.filter, &self.search)
    }
}

/// Keep stories whose tag set contains `tag`; `"all"` (or blank) keeps everything
pub fn filter_by_tag(stories: &[Story], tag: &str) -> Vec<Story> {
    let tag = tag.trim();
    if tag.is_empty() || tag == ALL_TAGS {
        return stories.to_vec();
    }
    stories
        .iter()
        .filter(|story| story.tags.iter().any(|t| t == tag))
        .cloned()
        .collect()
}

/// Case-insensitive substring search over title, localized title, content,
/// participant name and tags; a blank term keeps everything
pub fn search(stories: &[Story], term: &str) -> Vec<Story> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return stories.to_vec();
    }
    stories
        .iter()
        .filter(|story| searchable_text(story).contains(&term))
        .cloned()
        .collect()
}

/// Filter by tag, then search within the filtered result
pub fn apply_view(stories: &[Story], filter_tag: &str, search_term: &str) -> Vec<Story> {
    search(&filter_by_tag(stories, filter_tag), search_term)
}

/// Sorted unique tags across the collection
pub fn available_tags(stories: &[Story]) -> Vec<String> {
    let mut tags: Vec<String> = stories.iter().flat_map(|s| s.tags.iter().cloned()).collect();
    tags.sort();
    tags.dedup();
    tags
}

fn searchable_text(story: &Story) -> String {
    let mut text = String::with_capacity(
        story.title.len() + story.content.len() + story.participant_name.len() + 32,
    );
    text.push_str(&story.title);
    if let Some(localized) = &story.title_localized {
        text.push_str(localized);
    }
    text.push_str(&story.content);
    text.push_str(&story.participant_name);
    for tag in &story.tags {
        text.push_str(tag);
    }
    text.to_lowercase()
}
