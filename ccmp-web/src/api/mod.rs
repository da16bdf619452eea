//! HTTP API handlers for ccmp-web

pub mod health;
pub mod stories;
pub mod submissions;
pub mod ui;

pub use health::health_routes;
pub use stories::list_stories;
pub use submissions::{post_application, post_story_submission};
pub use ui::{apply_page, home_page, serve_app_js, serve_site_css, stories_page};
