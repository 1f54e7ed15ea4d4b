use super::{MetadataProvider, SearchQuery};
use crate::error::{MovierError, Result};
use crate::model::{MovieDetails, SearchHit};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://www.omdbapi.com/";

/// OMDb reports an unknown title as an error payload with this message.
const NOT_FOUND_MESSAGE: &str = "Movie not found!";

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Search", default)]
    search: Vec<SearchHit>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Client for the OMDb API.
///
/// Every request has a timeout, and transport failures or 5xx answers are
/// retried a bounded number of times before surfacing as
/// [`MovierError::Provider`].
pub struct OmdbProvider {
    client: Client,
    api_url: String,
    api_key: String,
    retries: u32,
}

impl OmdbProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("movier/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| MovierError::Provider(format!("client: {}", e)))?;
        Ok(Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            retries: 2,
        })
    }

    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    fn get(&self, params: &[(&str, &str)]) -> Result<String> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_get(params) {
                Ok(body) => return Ok(body),
                Err(Failure::Fatal(e)) => return Err(e),
                Err(Failure::Retryable(e)) if attempt > self.retries => return Err(e),
                Err(Failure::Retryable(e)) => {
                    warn!(attempt, error = %e, "OMDb request failed, retrying");
                    thread::sleep(Duration::from_millis(500 * u64::from(attempt)));
                }
            }
        }
    }

    fn try_get(&self, params: &[(&str, &str)]) -> std::result::Result<String, Failure> {
        debug!(?params, "OMDb request");
        let resp = self
            .client
            .get(&self.api_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .map_err(|e| Failure::Retryable(MovierError::Provider(format!("network: {}", e))))?;

        let status = resp.status();
        if status.is_server_error() {
            return Err(Failure::Retryable(MovierError::Provider(format!(
                "HTTP {}",
                status
            ))));
        }
        if !status.is_success() {
            return Err(Failure::Fatal(MovierError::Provider(format!(
                "HTTP {}",
                status
            ))));
        }
        resp.text()
            .map_err(|e| Failure::Retryable(MovierError::Provider(format!("read: {}", e))))
    }
}

enum Failure {
    Retryable(MovierError),
    Fatal(MovierError),
}

impl MetadataProvider for OmdbProvider {
    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let mut params = vec![("s", query.keyword.as_str())];
        if let Some(year) = query.year.as_deref() {
            params.push(("y", year));
        }
        let body = self.get(&params)?;
        parse_search(&body, query)
    }

    fn fetch_details(&self, id: &str) -> Result<MovieDetails> {
        let body = self.get(&[("i", id), ("plot", "short")])?;
        parse_details(&body)
    }
}

fn parse_search(body: &str, query: &SearchQuery) -> Result<Vec<SearchHit>> {
    let envelope: SearchEnvelope =
        serde_json::from_str(body).map_err(|e| MovierError::Provider(format!("parse: {}", e)))?;
    match envelope.error {
        Some(message) if message == NOT_FOUND_MESSAGE => Ok(Vec::new()),
        Some(message) => Err(MovierError::Provider(message)),
        None => Ok(envelope
            .search
            .into_iter()
            .filter(|hit| query.matches(hit))
            .collect()),
    }
}

fn parse_details(body: &str) -> Result<MovieDetails> {
    let envelope: ErrorEnvelope =
        serde_json::from_str(body).map_err(|e| MovierError::Provider(format!("parse: {}", e)))?;
    if let Some(message) = envelope.error {
        return Err(MovierError::Provider(message));
    }
    serde_json::from_str(body).map_err(|e| MovierError::Provider(format!("parse: {}", e)))
}
