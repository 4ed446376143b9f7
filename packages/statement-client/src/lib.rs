//! Pure bank statement extraction REST client.
//!
//! A minimal client for the statement extraction API. Uploads one PDF together
//! with the desired column definitions and returns the extracted rows. Also
//! exposes the service's health and column-suggestion endpoints.
//!
//! # Example
//!
//! ```rust,ignore
//! use statement_client::{ClientConfig, ColumnDefinition, StatementClient};
//!
//! let client = StatementClient::new(ClientConfig::new("http://localhost:8089"))?;
//!
//! let columns = vec![ColumnDefinition::new("Date"), ColumnDefinition::new("Amount")];
//! let rows = client
//!     .extract_transactions("statement.pdf", pdf_bytes, &columns)
//!     .await?;
//! for row in &rows {
//!     println!("{} {}", row.display("Date"), row.display("Amount"));
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{ClientError, Result};
pub use types::{CellValue, ColumnDefinition, ColumnId, ColumnSuggestions, HealthStatus, Transaction};

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use types::ExtractionResponse;

/// Default address of the extraction service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8089";

const EXTRACT_PATH: &str = "/process-bank-statement-json";
const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Connection settings for [`StatementClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the statement extraction API.
#[derive(Clone)]
pub struct StatementClient {
    client: reqwest::Client,
    base_url: String,
}

impl StatementClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build().map_err(ClientError::Network)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a PDF and extract its transactions for the given columns.
    ///
    /// Sends a multipart body with the document under `file` and the
    /// JSON-encoded column definitions under `columns`.
    pub async fn extract_transactions(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        columns: &[ColumnDefinition],
    ) -> Result<Vec<Transaction>> {
        tracing::info!(
            file_name,
            size = bytes.len(),
            columns = columns.len(),
            "Submitting bank statement for extraction"
        );

        let file_part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(PDF_MEDIA_TYPE)
            .map_err(ClientError::Network)?;
        let form = Form::new()
            .part("file", file_part)
            .text("columns", serde_json::to_string(columns)?);

        let url = format!("{}{}", self.base_url, EXTRACT_PATH);
        let resp = self.client.post(&url).multipart(form).send().await?;
        let body: ExtractionResponse = Self::parse_json(resp).await?;

        let mut transactions = match body {
            ExtractionResponse {
                transactions: Some(rows),
                ..
            } => rows,
            ExtractionResponse {
                success: Some(false),
                message,
                ..
            } => {
                let message = message.unwrap_or_else(|| "Processing failed".to_string());
                tracing::warn!(%message, "Extraction service reported failure");
                return Err(ClientError::ServiceFailure { message });
            }
            _ => {
                return Err(ClientError::MalformedResponse(
                    "response has no transactions list".to_string(),
                ))
            }
        };

        // The service numbers rows itself; fall back to position when it doesn't.
        for (index, row) in transactions.iter_mut().enumerate() {
            if row.id.is_empty() {
                row.id = (index + 1).to_string();
            }
        }

        tracing::info!(count = transactions.len(), "Extraction completed");
        Ok(transactions)
    }

    /// Check whether the service is up.
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Self::parse_json(resp).await
    }

    /// Fetch suggested column names, optionally for one bank.
    pub async fn column_suggestions(&self, bank: Option<&str>) -> Result<ColumnSuggestions> {
        let url = format!("{}/column-suggestions", self.base_url);
        let mut req = self.client.get(&url);
        if let Some(bank) = bank {
            req = req.query(&[("bank_name", bank)]);
        }

        let resp = req.send().await?;
        Self::parse_json(resp).await
    }

    async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let text = resp.text().await?;
        tracing::debug!(status = status.as_u16(), bytes = text.len(), "Received API response");
        serde_json::from_str(&text).map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}
