//! Story card rendering
//!
//! Pure mapping from stories to HTML fragments. Excerpts are computed on the
//! plain-text projection of the content so the ellipsis lands on visible text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use super::normalize::Story;
use super::view::ALL_TAGS;

/// Maximum excerpt length in characters, ellipsis excluded
pub const EXCERPT_CHAR_LIMIT: usize = 100;

/// Appended to truncated excerpts
pub const ELLIPSIS: &str = "...";

/// Delay between successive card entrance animations
pub const CARD_STAGGER_MS: u64 = 100;

/// Shown in place of cards when the current view is empty
pub const NO_MATCHES_MESSAGE: &str = "没有找到符合条件的故事";

/// Elements whose content is dropped along with the element itself
const CONTENT_DROPPED: [&str; 2] = ["script", "style"];

/// Sanitizer that keeps no elements at all, only their text
static TEXT_ONLY: Lazy<ammonia::Builder<'static>> = Lazy::new(|| {
    let mut builder = ammonia::Builder::empty();
    builder.clean_content_tags(CONTENT_DROPPED.iter().copied().collect::<HashSet<_>>());
    builder
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Escape text for HTML element content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Sanitize rich content for embedding in a page
///
/// Drops script and style elements with their content, event-handler
/// attributes and any element outside the allow-list (`template` included),
/// and re-serializes the rest as well-formed markup.
pub fn sanitize_content(html: &str) -> String {
    ammonia::clean(html)
}

/// Plain-text projection of rich content, as a browser's `textContent` would
/// show it
///
/// The content is parsed as HTML, so entities of every form are decoded and a
/// `<` that does not open a tag stays text. Whitespace is collapsed.
pub fn strip_markup(html: &str) -> String {
    let text = TEXT_ONLY.clean(html).to_string();
    let decoded = unescape_serialized_text(&text);
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

/// Undo the escaping the sanitizer's serializer applies to text nodes
fn unescape_serialized_text(text: &str) -> String {
    // &amp; last so an escaped "&lt;" literal stays "&lt;"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Card excerpt: plain text capped at [`EXCERPT_CHAR_LIMIT`] characters
pub fn excerpt(content: &str) -> String {
    let plain = strip_markup(content);
    if plain.chars().count() <= EXCERPT_CHAR_LIMIT {
        return plain;
    }
    let mut truncated: String = plain.chars().take(EXCERPT_CHAR_LIMIT).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Display data for one gallery card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryCard {
    pub story_id: String,
    pub title: String,
    pub title_localized: Option<String>,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub image_url: String,
    pub date: String,
    pub read_time: String,
    pub author_name: String,
    pub author_role: String,
    pub author_initial: String,
    pub animation_delay_ms: u64,
}

impl StoryCard {
    /// Build the card for the story at `index` in the current view
    pub fn from_story(story: &Story, index: usize) -> Self {
        Self {
            story_id: story.id.clone(),
            title: story.title.clone(),
            title_localized: story.title_localized.clone(),
            excerpt: excerpt(&story.content),
            tags: story.tags.clone(),
            image_url: story.image_url.clone(),
            date: story.date.clone(),
            read_time: story.read_time.clone(),
            author_name: story.participant_name.clone(),
            author_role: story.participant_role.clone(),
            author_initial: story
                .participant_name
                .chars()
                .next()
                .map(|c| c.to_string())
                .unwrap_or_default(),
            animation_delay_ms: index as u64 * CARD_STAGGER_MS,
        }
    }

    pub fn to_html(&self) -> String {
        let localized = self
            .title_localized
            .as_ref()
            .map(|t| format!(r#"<h4 class="story-title-cn">{}</h4>"#, escape_html(t)))
            .unwrap_or_default();

        format!(
            r#"<article class="story-card reveal" data-story-id="{id}" style="animation-delay: {delay}ms">
    <div class="story-image-wrapper">
        <div class="image-overlay"></div>
        <img src="{image}" alt="{title}" class="story-image">
        <div class="story-card-badges">{badges}</div>
    </div>
    <div class="story-content">
        <div class="story-meta">
            <span class="story-date">{date}</span>
            <span class="story-read-time">· {read_time}</span>
        </div>
        <h3 class="story-title-en">{title}</h3>
        {localized}
        <p class="story-excerpt">{excerpt}</p>
        <div class="story-author">
            <div class="author-avatar-placeholder">{initial}</div>
            <div class="author-info">
                <span class="author-name">{author}</span>
                <span class="author-role">{role}</span>
            </div>
        </div>
    </div>
</article>"#,
            id = escape_html(&self.story_id),
            delay = self.animation_delay_ms,
            image = escape_html(&self.image_url),
            title = escape_html(&self.title),
            badges = tag_badges(&self.tags),
            date = escape_html(&self.date),
            read_time = escape_html(&self.read_time),
            localized = localized,
            excerpt = escape_html(&self.excerpt),
            initial = escape_html(&self.author_initial),
            author = escape_html(&self.author_name),
            role = escape_html(&self.author_role),
        )
    }
}

/// Cards for a view, in order
pub fn render_cards(stories: &[Story]) -> Vec<StoryCard> {
    stories
        .iter()
        .enumerate()
        .map(|(index, story)| StoryCard::from_story(story, index))
        .collect()
}

/// Inner HTML of the cards container
pub fn render_gallery(cards: &[StoryCard]) -> String {
    if cards.is_empty() {
        return format!(r#"<p class="no-stories">{}</p>"#, NO_MATCHES_MESSAGE);
    }
    cards
        .iter()
        .map(StoryCard::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tag badges markup
pub fn tag_badges(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, escape_html(tag)))
        .collect()
}

/// Filter buttons; each link carries the current search term so search keeps
/// composing with the newly selected filter
pub fn render_filter_bar(tags: &[String], active: &str, search_term: &str) -> String {
    let active = if active.trim().is_empty() { ALL_TAGS } else { active.trim() };
    std::iter::once(ALL_TAGS)
        .chain(tags.iter().map(String::as_str))
        .map(|tag| {
            let class = if tag == active { "filter-btn active" } else { "filter-btn" };
            format!(
                r#"<a class="{class}" data-filter="{tag_attr}" href="{href}">{label}</a>"#,
                class = class,
                tag_attr = escape_html(tag),
                href = escape_html(&gallery_href(tag, search_term)),
                label = escape_html(tag),
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

/// Gallery URL for a filter/search combination
pub fn gallery_href(tag: &str, search_term: &str) -> String {
    let mut href = format!("/stories?tag={}", urlencoding::encode(tag));
    if !search_term.trim().is_empty() {
        href.push_str("&q=");
        href.push_str(&urlencoding::encode(search_term.trim()));
    }
    href
}
