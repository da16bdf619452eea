//! Story detail overlay
//!
//! Each visible story ships its full content in a `<template>` so opening the
//! overlay needs no network round-trip. The page script clones the template
//! into the overlay and owns the scroll lock.

use super::normalize::Story;
use super::render::{escape_html, sanitize_content, tag_badges};

/// `<template>` holding the full detail view of one story
pub fn render_detail_template(story: &Story) -> String {
    let subtitle = story
        .title_localized
        .as_ref()
        .map(|t| format!(r#"<h2 class="content-subtitle-cn">{}</h2>"#, escape_html(t)))
        .unwrap_or_default();

    format!(
        r#"<template id="story-detail-{id}" data-story-id="{id}">
    <div class="view-story-image" style="background-image: url('{image}')"></div>
    <div class="view-story-body">
        <div class="view-story-tags">{badges}</div>
        <h1 class="view-story-title">{title}</h1>
        <div class="view-story-meta">
            <span class="view-story-author">{author}</span>
            <span class="view-story-date">{date}</span>
            <span class="view-read-time">{read_time}</span>
        </div>
        <div class="view-story-content">{subtitle}{content}</div>
    </div>
</template>"#,
        id = escape_html(&story.id),
        image = escape_html(&story.image_url),
        badges = tag_badges(&story.tags),
        title = escape_html(&story.title),
        author = escape_html(&story.participant_name),
        date = escape_html(&story.date),
        read_time = escape_html(&story.read_time),
        subtitle = subtitle,
        content = sanitize_content(&story.content),
    )
}

/// Templates for every story in the view
pub fn render_detail_templates(stories: &[Story]) -> String {
    stories
        .iter()
        .map(render_detail_template)
        .collect::<Vec<_>>()
        .join("\n")
}
