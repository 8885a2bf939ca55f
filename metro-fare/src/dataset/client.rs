//! HTTP client for the published fare dataset.

use super::error::DatasetError;
use super::types::MetroDataDto;

/// Default location of the published dataset.
pub const DEFAULT_DATA_URL: &str = "https://static.qinxr.cn/Hyacinth/farecalc.json";

/// Configuration for the dataset client.
#[derive(Debug, Clone)]
pub struct DatasetClientConfig {
    /// URL of the dataset document
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DatasetClientConfig {
    /// Create a config for the given URL with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 15,
        }
    }

    /// Set a custom timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DatasetClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_URL)
    }
}

/// Client fetching the dataset document.
#[derive(Debug, Clone)]
pub struct DatasetClient {
    http: reqwest::Client,
    url: String,
}

impl DatasetClient {
    /// Create a new dataset client.
    pub fn new(config: DatasetClientConfig) -> Result<Self, DatasetError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// Fetch and parse the dataset.
    pub async fn fetch(&self) -> Result<MetroDataDto, DatasetError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DatasetError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| DatasetError::Json {
            message: e.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
