//! Person sources.
//!
//! The roster lives in an external tabular store (Airtable-style REST API).
//! Handlers only see the `PersonSource` trait so tests can swap in a fixed
//! list of people.

use std::future::Future;
use std::pin::Pin;

use globe::{Person, PersonRecord};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::StoreConfig;

/// Error type for person source operations.
#[derive(Debug)]
pub struct SourceError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Anything that can list the neighborhood.
///
/// Implementations must be `Send + Sync` for use across async tasks.
/// Methods return boxed futures for dyn-compatibility.
pub trait PersonSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Fetch every person. An empty list is a valid answer; rows that cannot be
    /// read as a person are skipped.
    fn fetch_people(&self) -> BoxFuture<'_, Result<Vec<Person>, SourceError>>;
}

/// One page of the store's record listing.
#[derive(Debug, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<StoreRecord>,
    /// Cursor for the next page; absent on the last one.
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StoreRecord {
    pub id: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl StoreRecord {
    /// The row's fields as a person; the row id stands in for a missing `id` field.
    pub fn into_person(self) -> Result<Person, SourceError> {
        let mut fields = self.fields;
        if !matches!(fields.get("id"), Some(serde_json::Value::String(_))) {
            fields.insert("id".to_string(), serde_json::Value::String(self.id.clone()));
        }
        let record: PersonRecord = serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| SourceError::with_source(format!("record {}", self.id), e))?;
        Ok(record.into_person())
    }
}

pub fn parse_page(body: &str) -> Result<RecordPage, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::with_source("malformed record page", e))
}

/// Paginated reader for the external tabular store.
pub struct TabularStore {
    config: StoreConfig,
    http: reqwest::Client,
}

impl TabularStore {
    pub fn new(config: StoreConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/v0/{}/{}",
            self.config.url.trim_end_matches('/'),
            self.config.base,
            self.config.table
        )
    }

    async fn fetch_page(&self, offset: Option<&str>) -> Result<RecordPage, SourceError> {
        let mut query = vec![("pageSize", self.config.page_size.to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let mut request = self.http.get(self.table_url()).query(&query);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| SourceError::with_source("store request failed", e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::new(format!("store returned {status}")));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| SourceError::with_source("store read failed", e))?;
        parse_page(&body)
    }
}

impl PersonSource for TabularStore {
    fn name(&self) -> &str {
        &self.config.table
    }

    fn fetch_people(&self) -> BoxFuture<'_, Result<Vec<Person>, SourceError>> {
        Box::pin(async move {
            let mut people = Vec::new();
            let mut offset: Option<String> = None;

            for page_no in 0..self.config.max_pages {
                let page = self.fetch_page(offset.as_deref()).await?;
                debug!(page = page_no, rows = page.records.len(), "fetched store page");
                for record in page.records {
                    match record.into_person() {
                        Ok(person) => people.push(person),
                        Err(err) => warn!("skipping unreadable {err}"),
                    }
                }
                match page.offset {
                    Some(next) => offset = Some(next),
                    None => return Ok(people),
                }
            }

            Err(SourceError::new(format!(
                "store listing exceeded {} pages",
                self.config.max_pages
            )))
        })
    }
}

/// A fixed list of people.
pub struct StaticSource {
    people: Vec<Person>,
}

impl StaticSource {
    pub fn new(people: Vec<Person>) -> Self {
        Self { people }
    }
}

impl PersonSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_people(&self) -> BoxFuture<'_, Result<Vec<Person>, SourceError>> {
        let people = self.people.clone();
        Box::pin(async move { Ok(people) })
    }
}
