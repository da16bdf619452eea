//! Record normalization
//!
//! Maps raw remote records (field presence and types not guaranteed) into the
//! canonical [`Story`]. Normalization is total: every missing or malformed
//! field degrades to a documented default and is logged at debug level.

use ccmp_common::airtable::RawRecord;
use ccmp_common::time;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Placeholder image used when a record carries no attachment or URL
pub const DEFAULT_IMAGE_URL: &str = "images/default_story_bg.png";

/// Display name for records without a participant name
pub const DEFAULT_PARTICIPANT_NAME: &str = "Anonymous";

/// Display role for records without a participant role
pub const DEFAULT_PARTICIPANT_ROLE: &str = "Scholar";

/// Title for records without one
pub const DEFAULT_TITLE: &str = "Untitled";

/// Read-time label shown on every card
pub const READ_TIME_LABEL: &str = "5 min read";

// Remote field names in the stories table
const FIELD_TITLE: &str = "title";
const FIELD_TITLE_LOCALIZED: &str = "title_cn";
const FIELD_CONTENT: &str = "story_content";
const FIELD_TAGS: &str = "tags";
const FIELD_IMAGE_FILES: &str = "image_files";
const FIELD_IMAGE_URL: &str = "image_url";
const FIELD_NAME: &str = "name";
const FIELD_ROLE: &str = "role";
const FIELD_CREATED_TIME: &str = "created_time";

/// Canonical story used for filtering, searching and rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub title_localized: Option<String>,
    /// Rich text (HTML) body
    pub content: String,
    /// Unique labels in display order
    pub tags: Vec<String>,
    /// Never empty
    pub image_url: String,
    pub participant_name: String,
    pub participant_role: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub read_time: String,
}

/// Normalize every record of a listing
pub fn normalize_records(records: &[RawRecord], now: DateTime<Utc>) -> Vec<Story> {
    records.iter().map(|r| normalize_record(r, now)).collect()
}

/// Normalize one raw record
///
/// `now` supplies the date when the record carries no usable timestamp.
pub fn normalize_record(record: &RawRecord, now: DateTime<Utc>) -> Story {
    let fields = &record.fields;

    let title = text_field(fields, FIELD_TITLE).unwrap_or_else(|| {
        debug!(record_id = %record.id, "Record has no title, using default");
        DEFAULT_TITLE.to_string()
    });

    let participant_name = text_field(fields, FIELD_NAME).unwrap_or_else(|| {
        debug!(record_id = %record.id, "Record has no participant name, using default");
        DEFAULT_PARTICIPANT_NAME.to_string()
    });

    let participant_role = text_field(fields, FIELD_ROLE)
        .unwrap_or_else(|| DEFAULT_PARTICIPANT_ROLE.to_string());

    Story {
        id: record.id.clone(),
        title,
        title_localized: text_field(fields, FIELD_TITLE_LOCALIZED),
        content: fields
            .get(FIELD_CONTENT)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        tags: resolve_tags(fields.get(FIELD_TAGS)),
        image_url: resolve_image_url(&record.id, fields),
        participant_name,
        participant_role,
        date: resolve_date(record, now),
        read_time: READ_TIME_LABEL.to_string(),
    }
}

/// Non-blank string field, trimmed
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Image resolution: first attachment URL, then plain URL field, then placeholder
fn resolve_image_url(record_id: &str, fields: &Map<String, Value>) -> String {
    let attachment = fields
        .get(FIELD_IMAGE_FILES)
        .and_then(Value::as_array)
        .and_then(|files| files.first())
        .and_then(|file| file.get("url"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty());

    if let Some(url) = attachment {
        return url.to_string();
    }

    if let Some(url) = text_field(fields, FIELD_IMAGE_URL) {
        return url;
    }

    debug!(record_id = %record_id, "Record has no image, using placeholder");
    DEFAULT_IMAGE_URL.to_string()
}

/// Tag resolution: sequence as-is, comma-joined string split and trimmed, else empty
fn resolve_tags(value: Option<&Value>) -> Vec<String> {
    let raw: Vec<&str> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(joined)) => joined.split(',').collect(),
        _ => Vec::new(),
    };

    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw.into_iter().map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Date resolution: `created_time` field, then record `createdTime`, then `now`
fn resolve_date(record: &RawRecord, now: DateTime<Utc>) -> String {
    let field_time = record.fields.get(FIELD_CREATED_TIME).and_then(Value::as_str);

    field_time
        .into_iter()
        .chain(record.created_time.as_deref())
        .find_map(time::parse_date)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| {
            debug!(record_id = %record.id, "Record has no usable timestamp, using today");
            time::ymd(now)
        })
}
