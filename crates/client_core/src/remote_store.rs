//! PostgREST-backed event store (Supabase `rest/v1`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use shared::{
    error::ApiError,
    protocol::{EventRecord, EventRow},
};
use tracing::{info, warn};
use url::Url;

use crate::store::{EventStore, StoreError};

pub const DEFAULT_EVENTS_TABLE: &str = "events";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct RemoteStoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub timeout: Duration,
}

impl RemoteStoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: DEFAULT_EVENTS_TABLE.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

pub struct RemoteStore {
    http: Client,
    table_url: Url,
    api_key: String,
}

impl RemoteStore {
    pub fn new(config: RemoteStoreConfig) -> Result<Self, StoreError> {
        let mut base = Url::parse(config.base_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let table_url = base.join(&format!("rest/v1/{}", config.table))?;
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            table_url,
            api_key: config.api_key,
        })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl EventStore for RemoteStore {
    async fn insert(&self, record: EventRecord) -> Result<EventRecord, StoreError> {
        let response = self
            .authorized(self.http.post(self.table_url.clone()))
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, "application/json")
            .json(&EventRow::from(record))
            .send()
            .await?;

        let rows = decode_rows(check_status(response).await?).await?;
        let stored = rows.into_iter().next().ok_or(StoreError::EmptyInsert)?;
        info!(id = ?stored.id, name = %stored.name, "event stored remotely");
        Ok(stored.into())
    }

    async fn list(&self) -> Result<Vec<EventRecord>, StoreError> {
        let response = self
            .authorized(self.http.get(self.table_url.clone()))
            .query(&[("select", "*"), ("order", "date.asc")])
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let rows = decode_rows(check_status(response).await?).await?;
        info!(count = rows.len(), "loaded events from remote store");
        Ok(rows.into_iter().map(EventRecord::from).collect())
    }
}

/// Reads a success body as a JSON array of rows. A proxy answering 200 with
/// an HTML page ends up here rather than as a transport error.
async fn decode_rows(response: Response) -> Result<Vec<EventRow>, StoreError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|err| {
        warn!(error = %err, "remote store response is not a row array");
        StoreError::InvalidResponse(err.to_string())
    })
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => api_error.summary(),
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => body,
    };
    warn!(status = status.as_u16(), %message, "remote store rejected request");
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "tests/remote_store_tests.rs"]
mod tests;
