//! Airtable REST client
//!
//! Record-oriented remote store used for story listing and form submissions.
//! Every request carries the static bearer token and a JSON content type.
//! There is no retry policy: one failed attempt is terminal for the caller's
//! action.

pub mod types;

pub use types::{ListQuery, RawRecord, RecordId, RemoteError};

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AirtableConfig;
use types::{CreateRequest, CreateResponse, ListResponse};

const USER_AGENT: &str = concat!("ccmp/", env!("CARGO_PKG_VERSION"));

/// Remote record store contract
///
/// Implemented by [`AirtableClient`]; tests substitute in-memory stores.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create one record in `table`, returning its id
    async fn create(&self, table: &str, fields: Map<String, Value>) -> Result<RecordId, RemoteError>;

    /// List records of `table`
    async fn list(&self, table: &str, query: &ListQuery) -> Result<Vec<RawRecord>, RemoteError>;
}

/// Airtable API client
pub struct AirtableClient {
    http_client: reqwest::Client,
    /// `{api_url}/{base_id}`
    base_url: Url,
    api_key: String,
}

impl AirtableClient {
    /// Create a client for one base
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(
        api_url: &str,
        base_id: &str,
        api_key: String,
        timeout: Option<Duration>,
    ) -> Result<Self, RemoteError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let base_url = Url::parse(&format!("{}/{}", api_url.trim_end_matches('/'), base_id))
            .map_err(|e| RemoteError::Transport(format!("Invalid API URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::Transport(format!("Invalid API URL: {}", base_url)));
        }

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    /// Create a client from the `[airtable]` config section
    pub fn from_config(config: &AirtableConfig, api_key: String) -> Result<Self, RemoteError> {
        Self::new(
            &config.api_url,
            &config.base_id,
            api_key,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    /// Base URL (`{api_url}/{base_id}`) this client targets
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of one table; the table name is a single percent-encoded segment
    pub fn table_url(&self, table: &str) -> Url {
        let mut url = self.base_url.clone();
        // new() rejects cannot-be-a-base URLs, so this always succeeds
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(table);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    /// Send a request and decode a 2xx JSON body
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn create(&self, table: &str, fields: Map<String, Value>) -> Result<RecordId, RemoteError> {
        let url = self.table_url(table);
        debug!(table = %table, fields = fields.len(), "Creating Airtable record");

        let body = serde_json::to_vec(&CreateRequest { fields: &fields })
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        let created: CreateResponse = self
            .execute(self.request(Method::POST, url).body(body))
            .await
            .map_err(|e| {
                warn!(table = %table, error = %e, "Airtable create failed");
                e
            })?;

        info!(table = %table, record_id = %created.id, "Created Airtable record");
        Ok(created.id)
    }

    async fn list(&self, table: &str, query: &ListQuery) -> Result<Vec<RawRecord>, RemoteError> {
        let url = self.table_url(table);
        debug!(table = %table, query = ?query, "Listing Airtable records");

        let listed: ListResponse = self
            .execute(self.request(Method::GET, url).query(&query.to_pairs()))
            .await
            .map_err(|e| {
                warn!(table = %table, error = %e, "Airtable list failed");
                e
            })?;

        if listed.offset.is_some() {
            debug!(table = %table, "More records available beyond the record cap; ignoring");
        }

        info!(table = %table, count = listed.records.len(), "Listed Airtable records");
        Ok(listed.records)
    }
}
