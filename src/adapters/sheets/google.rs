//! Google Sheets values API source
//!
//! Each table is a sheet (tab) in one spreadsheet. Tables are read with
//! `GET /v4/spreadsheets/{id}/values/{sheet}`; the first row is the header.

use super::{Table, TableSource};
use crate::config::{SecretString, SourceConfig};
use crate::domain::{Result, SourceError, SyncError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Response body of the values endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Google Sheets table source
pub struct GoogleSheetsSource {
    base_url: Url,
    spreadsheet_id: String,
    api_key: SecretString,
    client: Client,
}

impl GoogleSheetsSource {
    /// Create a new source from configuration
    ///
    /// # Errors
    ///
    /// Configuration error when the spreadsheet id, API key or base URL is
    /// missing or invalid, or the HTTP client cannot be built.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let spreadsheet_id = config.spreadsheet_id.clone().ok_or_else(|| {
            SyncError::Configuration("source.spreadsheet_id is required".to_string())
        })?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| SyncError::Configuration("source.api_key is required".to_string()))?;
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            SyncError::Configuration(format!("Invalid source.base_url '{}': {e}", config.base_url))
        })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            spreadsheet_id,
            api_key,
            client,
        })
    }

    /// URL of the values endpoint for one sheet
    fn values_url(&self, sheet: &str) -> std::result::Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidFormat("source.base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", sheet]);
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE")
            .append_pair("key", self.api_key.expose_secret().as_ref());
        Ok(url)
    }
}

#[async_trait]
impl TableSource for GoogleSheetsSource {
    async fn load_table(&self, name: &str) -> std::result::Result<Table, SourceError> {
        let url = self.values_url(name)?;

        tracing::debug!(
            spreadsheet_id = %self.spreadsheet_id,
            table = %name,
            "Loading sheet values"
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                    tracing::debug!(table = %name, body = %body, "Sheet lookup rejected");
                    SourceError::TableNotFound(name.to_string())
                }
                _ => SourceError::RequestFailed {
                    status: status.as_u16(),
                    message: body,
                },
            });
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidFormat(e.to_string()))?;

        let grid = range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();

        Ok(Table::from_grid(name, grid))
    }

    fn describe(&self) -> String {
        format!("google-sheets:{}", self.spreadsheet_id)
    }
}

/// Render a JSON cell as the string the sheet displays
pub(crate) fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}
