//! Server-rendered pages
//!
//! Every page shares one layout that links the stylesheet and page script and
//! embeds the binding table.

use ccmp_common::config::SiteStats;

use crate::bindings::BindingTable;
use crate::gallery::detail::render_detail_templates;
use crate::gallery::render::{escape_html, render_cards, render_filter_bar, render_gallery};
use crate::gallery::view::available_tags;
use crate::gallery::{LoadOutcome, ViewState};
use crate::submission::forms::{render_form, APPLICATION_FORM, STORY_FORM};

/// Shown when the story table is empty or could not be loaded
pub const NO_STORIES_MESSAGE: &str = "暂时还没有故事，敬请期待 / No stories yet";

fn layout(title: &str, active_nav: &str, body: &str, bindings: &BindingTable) -> String {
    let nav = [("/", "首页 Home"), ("/stories", "咖啡故事 Stories"), ("/apply", "申请 Apply")]
        .iter()
        .map(|(href, label)| {
            let class = if *href == active_nav { r#" class="active""# } else { "" };
            format!(r#"<li><a href="{}"{}>{}</a></li>"#, href, class, label)
        })
        .collect::<String>();

    format!(
        r#"<!DOCTYPE html>
<html lang="zh">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/site.css">
</head>
<body>
    <div class="bg-shape bg-shape-1"></div>
    <div class="bg-shape bg-shape-2"></div>
    <nav class="navbar">
        <a class="brand" href="/">Coffee Chat</a>
        <ul class="nav-menu">{nav}</ul>
    </nav>
    <main>
{body}
    </main>
    <script type="application/json" id="ccmp-bindings">{bindings}</script>
    <script src="/static/app.js"></script>
</body>
</html>
"#,
        title = escape_html(title),
        nav = nav,
        body = body,
        bindings = bindings.to_script_json(),
    )
}

/// Home page with the animated program statistics
pub fn home_page(stats: &SiteStats, bindings: &BindingTable) -> String {
    let stat = |id: &str, target: u32, label: &str| {
        format!(
            r#"<div class="stat"><span class="stat-number" id="{id}" data-target="{target}">0</span><span class="stat-label">{label}</span></div>"#,
            id = id,
            target = target,
            label = label,
        )
    };

    let body = format!(
        r##"<section id="hero" class="hero reveal">
    <h1>一杯咖啡，一次对话</h1>
    <p>Coffee chats between scholars and mentors who have walked the path before.</p>
    <a class="button" href="/apply">立即申请 Apply</a>
</section>
<section id="stats" class="stats reveal">
    {conversations}
    {stories}
    {countries}
    {scholars}
</section>
<section id="join" class="join reveal">
    <h2>如何参与 How to join</h2>
    <div class="join-step">1. 提交申请 Submit an application</div>
    <div class="join-step">2. 匹配导师 Get matched with a mentor</div>
    <div class="join-step">3. 喝杯咖啡 Have a coffee chat</div>
</section>
<section id="stories-teaser" class="reveal">
    <h2>咖啡故事 Coffee stories</h2>
    <a class="button" href="/stories">阅读故事 Read stories</a>
</section>"##,
        conversations = stat("stat-conversations", stats.conversations, "次对话 Conversations"),
        stories = stat("stat-stories", stats.stories, "个故事 Stories"),
        countries = stat("stat-countries", stats.countries, "个国家 Countries"),
        scholars = stat("stat-scholars", stats.scholars, "位学者 Scholars"),
    );

    layout("Coffee Chat", "/", &body, bindings)
}

/// Application page; `form_token` identifies this form instance
pub fn apply_page(form_token: &str, bindings: &BindingTable) -> String {
    let body = format!(
        r#"<section id="apply" class="apply reveal">
    <h1>申请咖啡对话 Apply for a coffee chat</h1>
    {form}
    <div id="success-message" class="success-message" style="display: none">
        <h2>申请提交成功！</h2>
        <p>Application submitted successfully. We will be in touch by email.</p>
    </div>
</section>"#,
        form = render_form(&APPLICATION_FORM, form_token, "submit-btn"),
    );

    layout("申请 Apply - Coffee Chat", "/apply", &body, bindings)
}

/// Story gallery for one view of the loaded collection
pub fn stories_page(
    outcome: &LoadOutcome,
    view: &ViewState,
    form_token: &str,
    bindings: &BindingTable,
) -> String {
    let all = outcome.stories();
    let has_stories = !all.is_empty();
    let visible = view.apply(all);

    // Hide the container (and show the empty block) when nothing was loaded
    let (container_style, empty_style) = if has_stories {
        ("", r#" style="display: none""#)
    } else {
        (r#" style="display: none""#, "")
    };

    let body = format!(
        r##"<section id="stories" class="stories">
    <h1>咖啡故事 Coffee Stories</h1>
    <div class="stories-toolbar">
        <div class="filter-bar">{filters}</div>
        <form id="search-form" class="search-form" action="/stories" method="get">
            <input type="hidden" name="tag" value="{tag}">
            <input type="search" id="search-input" name="q" value="{term}" placeholder="搜索故事 Search stories">
        </form>
        <button type="button" id="open-story-form" class="button">分享你的故事 Share your story</button>
    </div>
    <div id="stories-container" class="stories-grid"{container_style}>
{cards}
    </div>
    <div id="no-stories" class="no-stories"{empty_style}>{no_stories}</div>
{templates}
</section>
<div id="story-view-modal" class="modal story-view-modal">
    <div class="modal-content">
        <button type="button" id="close-story-view" class="modal-close">&times;</button>
        <div id="story-view-body"></div>
    </div>
</div>
<div id="story-modal" class="modal" style="display: none">
    <div class="modal-content">
        <button type="button" class="modal-close">&times;</button>
        <h2>分享你的故事 Share your story</h2>
        {story_form}
        <button type="button" id="cancel-story" class="button secondary">取消 Cancel</button>
    </div>
</div>"##,
        filters = render_filter_bar(&available_tags(all), &view.filter, &view.search),
        tag = escape_html(&view.filter),
        term = escape_html(&view.search),
        container_style = container_style,
        cards = if has_stories { render_gallery(&render_cards(&visible)) } else { String::new() },
        empty_style = empty_style,
        no_stories = NO_STORIES_MESSAGE,
        templates = render_detail_templates(&visible),
        story_form = render_form(&STORY_FORM, form_token, "story-submit-btn"),
    );

    layout("咖啡故事 Stories - Coffee Chat", "/stories", &body, bindings)
}
