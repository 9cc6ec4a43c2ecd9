use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::record::MediaRecord;

pub const DEFAULT_DATASET_URL: &str =
    "https://api.nasa.gov/planetary/apod?api_key=DEMO_KEY&count=12";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network request failed: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("response was not a list of pictures: {0}")]
    Parse(String),
}

pub trait DatasetSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<MediaRecord>, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub http_client: Option<HttpClient>,
}

pub struct HttpDatasetSource {
    http: HttpClient,
    url: String,
    user_agent: String,
}

impl HttpDatasetSource {
    pub fn new(config: ClientConfig) -> Result<Self> {
        anyhow::ensure!(!config.url.trim().is_empty(), "source: dataset url required");
        let http = match config.http_client {
            Some(client) => client,
            None => HttpClient::builder()
                .timeout(if config.timeout.is_zero() {
                    Duration::from_secs(20)
                } else {
                    config.timeout
                })
                .build()
                .context("source: build http client")?,
        };
        let user_agent = if config.user_agent.trim().is_empty() {
            format!("apod-gallery/{}", crate::VERSION)
        } else {
            config.user_agent
        };
        Ok(Self {
            http,
            url: config.url,
            user_agent,
        })
    }
}

impl DatasetSource for HttpDatasetSource {
    fn fetch(&self) -> Result<Vec<MediaRecord>, FetchError> {
        let response = self
            .http
            .get(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        parse_dataset(&body)
    }
}

pub fn parse_dataset(body: &str) -> Result<Vec<MediaRecord>, FetchError> {
    serde_json::from_str::<Vec<MediaRecord>>(body).map_err(|err| FetchError::Parse(err.to_string()))
}

#[derive(Debug, Clone, Default)]
pub struct StaticDatasetSource {
    records: Vec<MediaRecord>,
}

impl StaticDatasetSource {
    pub fn new(records: Vec<MediaRecord>) -> Self {
        Self { records }
    }
}

impl DatasetSource for StaticDatasetSource {
    fn fetch(&self) -> Result<Vec<MediaRecord>, FetchError> {
        Ok(self.records.clone())
    }
}
