//! Airtable wire types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Opaque record identifier assigned by the remote store (`rec...`)
pub type RecordId = String;

/// Remote store errors
///
/// Callers surface every variant to users as one generic failure message;
/// the detail is for logs only.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Non-2xx HTTP response
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    /// Network or transport failure (connect, TLS, reset)
    #[error("Network error: {0}")]
    Transport(String),

    /// 2xx response whose body was not the expected JSON
    #[error("Parse error: {0}")]
    Decode(String),
}

/// One record as returned by the list endpoint
///
/// `fields` is kept as an untyped map: field presence and types vary between
/// records and are resolved by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawRecord {
    pub id: RecordId,

    #[serde(default)]
    pub fields: Map<String, Value>,

    /// Record-level creation timestamp supplied by Airtable
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
}

/// List endpoint response body
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub records: Vec<RawRecord>,

    /// Continuation cursor; ignored since listing is capped by `maxRecords`
    #[serde(default)]
    pub offset: Option<String>,
}

/// Create endpoint request body
#[derive(Debug, Clone, Serialize)]
pub struct CreateRequest<'a> {
    pub fields: &'a Map<String, Value>,
}

/// Create endpoint response body
#[derive(Debug, Clone, Deserialize)]
pub struct CreateResponse {
    pub id: RecordId,
}

/// Query parameters for listing a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Maps to `maxRecords`
    pub max_records: Option<u32>,
    /// Maps to `view`
    pub view: Option<String>,
}

impl ListQuery {
    /// Query string pairs in the remote store's parameter names
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(max) = self.max_records {
            pairs.push(("maxRecords", max.to_string()));
        }
        if let Some(view) = &self.view {
            pairs.push(("view", view.clone()));
        }
        pairs
    }
}
