//! Integration tests for ccmp-web routes
//!
//! Tests cover:
//! - Health endpoint and error reporting
//! - Gallery page: cards, filter/search composition, empty and failed loads
//! - Story JSON endpoint
//! - Application and story submission outcomes

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use ccmp_common::airtable::{ListQuery, RawRecord, RecordId, RecordStore, RemoteError};
use ccmp_common::config::TomlConfig;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt; // for `oneshot` method
use ccmp_web::{build_router, AppState, SiteSettings};

/// In-memory record store
#[derive(Default)]
struct MockStore {
    records: Vec<RawRecord>,
    fail_list: bool,
    fail_create_with: Option<u16>,
    created: Mutex<Vec<(String, Map<String, Value>)>>,
    list_queries: Mutex<Vec<(String, ListQuery)>>,
}

impl MockStore {
    fn with_records(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    fn created(&self) -> Vec<(String, Map<String, Value>)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn create(&self, table: &str, fields: Map<String, Value>) -> Result<RecordId, RemoteError> {
        self.created.lock().unwrap().push((table.to_string(), fields));
        match self.fail_create_with {
            Some(status) => Err(RemoteError::Status {
                status,
                body: r#"{"error":{"type":"INVALID_VALUE_FOR_COLUMN"}}"#.to_string(),
            }),
            None => Ok("recCreated1".to_string()),
        }
    }

    async fn list(&self, table: &str, query: &ListQuery) -> Result<Vec<RawRecord>, RemoteError> {
        self.list_queries
            .lock()
            .unwrap()
            .push((table.to_string(), query.clone()));
        if self.fail_list {
            return Err(RemoteError::Transport("connection refused".to_string()));
        }
        Ok(self.records.clone())
    }
}

fn record(id: &str, fields: Value) -> RawRecord {
    serde_json::from_value(json!({
        "id": id,
        "createdTime": "2025-03-04T10:00:00.000Z",
        "fields": fields,
    }))
    .expect("valid record")
}

fn sample_records() -> Vec<RawRecord> {
    vec![
        record(
            "recCareer",
            json!({
                "title": "Finding my first job",
                "story_content": "<p>A coffee chat about career paths.</p>",
                "tags": "career, advice",
                "name": "Mei",
                "role": "Mentor",
            }),
        ),
        record(
            "recLife",
            json!({
                "title": "Moving abroad",
                "title_cn": "出国生活",
                "story_content": "Settling into a new city over coffee.",
                "tags": ["life"],
            }),
        ),
        record(
            "recResearch",
            json!({
                "title": "Picking a lab",
                "story_content": "Research advice from a senior lab member.",
                "tags": ["career", "research"],
            }),
        ),
    ]
}

/// Test helper: Create app state over the given store
fn setup_state(store: Arc<MockStore>) -> AppState {
    let settings = SiteSettings::from_config(&TomlConfig::default());
    AppState::new(store, settings)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

const VALID_APPLICATION: &str = "form_token=tok-app&name=Li+Wei&email=li%40example.com\
&university=Tsinghua&major=Physics&degree=PhD&location=Beijing\
&current_status=Student&interest_topics=Careers&preferred_meeting=Online";

const VALID_STORY: &str = "form_token=tok-story&submitter_name=Ann\
&submitter_email=ann%40example.org&story_title=My+chat\
&story_content=It+helped.&allow_publish=on";

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_router(setup_state(Arc::new(MockStore::default())));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "ccmp-web");
    assert!(body["version"].is_string());
    assert!(body["last_error"].is_null());
}

#[tokio::test]
async fn test_failed_listing_is_reported_by_health() {
    let store = Arc::new(MockStore {
        fail_list: true,
        ..Default::default()
    });
    let state = setup_state(store);

    let response = build_router(state.clone())
        .oneshot(get("/stories"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = build_router(state).oneshot(get("/health")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert!(body["last_error"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_home_and_apply_pages() {
    let state = setup_state(Arc::new(MockStore::default()));

    let response = build_router(state.clone()).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_text(response.into_body()).await;
    assert!(html.contains(r#"data-target="89""#));

    let response = build_router(state).oneshot(get("/apply")).await.unwrap();
    let html = extract_text(response.into_body()).await;
    assert!(html.contains(r#"id="application-form""#));
    assert!(html.contains(r#"name="form_token""#));
}

#[tokio::test]
async fn test_static_assets_served() {
    let state = setup_state(Arc::new(MockStore::default()));

    let response = build_router(state.clone())
        .oneshot(get("/static/app.js"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/javascript");
    let js = extract_text(response.into_body()).await;
    assert!(js.contains("ccmp-bindings"));

    let response = build_router(state)
        .oneshot(get("/static/site.css"))
        .await
        .unwrap();
    assert_eq!(response.headers()["content-type"], "text/css");
}

#[tokio::test]
async fn test_gallery_lists_with_configured_query() {
    let store = Arc::new(MockStore::with_records(sample_records()));
    let app = build_router(setup_state(store.clone()));

    let response = app.oneshot(get("/stories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_text(response.into_body()).await;

    assert!(html.contains(r#"data-story-id="recCareer""#));
    assert!(html.contains(r#"data-story-id="recLife""#));
    assert!(html.contains("出国生活"));
    assert!(html.contains("images/default_story_bg.png"));
    assert!(html.contains(r#"<a class="filter-btn active" data-filter="all""#));

    let queries = store.list_queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].0, "coffee_stories");
    assert_eq!(queries[0].1.max_records, Some(100));
    assert_eq!(queries[0].1.view.as_deref(), Some("Grid view"));
}

#[tokio::test]
async fn test_gallery_filter_composes_with_search() {
    let store = Arc::new(MockStore::with_records(sample_records()));
    let app = build_router(setup_state(store));

    let response = app
        .oneshot(get("/stories?tag=career&q=coffee"))
        .await
        .unwrap();
    let html = extract_text(response.into_body()).await;

    // recResearch matches the tag only; recLife matches the term only
    assert!(html.contains(r#"data-story-id="recCareer""#));
    assert!(!html.contains(r#"data-story-id="recResearch""#));
    assert!(!html.contains(r#"data-story-id="recLife""#));
    assert!(html.contains(r#"<a class="filter-btn active" data-filter="career""#));
    assert!(html.contains(r#"href="/stories?tag=research&amp;q=coffee""#));
}

#[tokio::test]
async fn test_gallery_empty_table_shows_empty_state() {
    let app = build_router(setup_state(Arc::new(MockStore::default())));

    let response = app.oneshot(get("/stories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_text(response.into_body()).await;

    assert!(html.contains(r#"<div id="stories-container" class="stories-grid" style="display: none">"#));
    assert!(html.contains(r#"<div id="no-stories" class="no-stories">"#));
    assert!(!html.contains(r#"class="story-card"#));
}

// =============================================================================
// Story JSON
// =============================================================================

#[tokio::test]
async fn test_api_stories_applies_view() {
    let store = Arc::new(MockStore::with_records(sample_records()));
    let app = build_router(setup_state(store));

    let response = app.oneshot(get("/api/stories?tag=career")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;

    assert_eq!(body["filter"], "career");
    assert_eq!(body["search"], "");
    assert_eq!(body["total"], 3);
    assert_eq!(body["tags"], json!(["advice", "career", "life", "research"]));

    let stories = body["stories"].as_array().unwrap();
    assert_eq!(stories.len(), 2);
    assert_eq!(stories[0]["id"], "recCareer");
    assert_eq!(stories[0]["tags"], json!(["career", "advice"]));
    assert_eq!(stories[0]["participant_name"], "Mei");
    assert_eq!(stories[1]["participant_name"], "Anonymous");
    assert_eq!(stories[1]["date"], "2025-03-04");
}

#[tokio::test]
async fn test_api_stories_failure_is_bad_gateway() {
    let store = Arc::new(MockStore {
        fail_list: true,
        ..Default::default()
    });
    let app = build_router(setup_state(store));

    let response = app.oneshot(get("/api/stories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
}

// =============================================================================
// Submissions
// =============================================================================

#[tokio::test]
async fn test_application_success() {
    let store = Arc::new(MockStore::default());
    let app = build_router(setup_state(store.clone()));

    let response = app
        .oneshot(post_form("/api/applications", VALID_APPLICATION))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["record_id"], "recCreated1");
    assert_eq!(body["submit_button"]["disabled"], false);
    assert_eq!(body["submit_button"]["label"], "提交申请 Submit");

    let created = store.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].0, "applications");
    assert_eq!(created[0].1["name"], "Li Wei");
    assert_eq!(created[0].1["email"], "li@example.com");
    assert_eq!(created[0].1["phone"], "");
    assert_eq!(created[0].1["status"], "待处理");
    assert!(!created[0].1.contains_key("form_token"));
}

#[tokio::test]
async fn test_application_empty_email_never_reaches_store() {
    let store = Arc::new(MockStore::default());
    let app = build_router(setup_state(store.clone()));

    let body = VALID_APPLICATION.replace("email=li%40example.com", "email=");
    let response = app
        .oneshot(post_form("/api/applications", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["details"]["fields"], json!(["email"]));
    assert!(store.created().is_empty());
}

#[tokio::test]
async fn test_story_remote_rejection_is_generic_failure() {
    let store = Arc::new(MockStore {
        fail_create_with: Some(422),
        ..Default::default()
    });
    let state = setup_state(store.clone());

    let response = build_router(state.clone())
        .oneshot(post_form("/api/story-submissions", VALID_STORY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"]["message"],
        "提交失败，请稍后重试 / Submission failed, please try again later"
    );
    assert_eq!(store.created().len(), 1);

    // The form instance is free to try again
    assert!(state.in_flight.try_begin("tok-story").is_some());
}

#[tokio::test]
async fn test_story_submission_success() {
    let store = Arc::new(MockStore::default());
    let app = build_router(setup_state(store.clone()));

    let response = app
        .oneshot(post_form("/api/story-submissions", VALID_STORY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = store.created();
    assert_eq!(created[0].0, "story_submissions");
    assert_eq!(created[0].1["allow_publish"], true);
    assert_eq!(created[0].1["anonymous"], false);
    assert_eq!(created[0].1["status"], "待审核");
    assert!(created[0].1["submission_date"].is_string());
}

#[tokio::test]
async fn test_duplicate_in_flight_submission_is_conflict() {
    let store = Arc::new(MockStore::default());
    let state = setup_state(store.clone());
    let _claim = state.in_flight.try_begin("tok-story").unwrap();

    let response = build_router(state.clone())
        .oneshot(post_form("/api/story-submissions", VALID_STORY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(store.created().is_empty());

    // A different form instance is unaffected
    let other = VALID_STORY.replace("tok-story", "tok-other");
    let response = build_router(state)
        .oneshot(post_form("/api/story-submissions", &other))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}
