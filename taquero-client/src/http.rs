//! HTTP client for the spreadsheet web app

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::sync::{SheetResponse, SyncRequest, SyncResponse};

/// Client for the single spreadsheet endpoint
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: Client,
    endpoint: Url,
}

impl SheetsClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| ClientError::Config(format!("invalid endpoint '{}': {e}", config.endpoint)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// URL used to read one sheet
    pub fn read_url(&self, sheet: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("sheet", sheet);
        url
    }

    /// Post one mutation
    pub async fn push(&self, request: &SyncRequest) -> ClientResult<SyncResponse> {
        tracing::debug!(
            action = %request.action,
            sheet = %request.sheet,
            id = %request.id,
            "Posting to sheet"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let body: SyncResponse = Self::handle_response(response).await?;
        if !body.is_success() {
            return Err(ClientError::Rejected(
                body.message.unwrap_or_else(|| body.status.clone()),
            ));
        }
        Ok(body)
    }

    /// Read every row of a sheet
    pub async fn fetch(&self, sheet: &str) -> ClientResult<Vec<Value>> {
        tracing::debug!(sheet = %sheet, "Reading sheet");

        let response = self.client.get(self.read_url(sheet)).send().await?;
        let body: SheetResponse = Self::handle_response(response).await?;
        if !body.is_success() {
            return Err(ClientError::Rejected(
                body.message.unwrap_or_else(|| body.status.clone()),
            ));
        }
        Ok(body.events)
    }

    /// Handle the HTTP response
    ///
    /// The web app answers errors with an HTML page, so the body is read as
    /// text first and parsed afterwards to keep a useful error message.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: truncate(&text, 200),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("{e}: {}", truncate(&text, 200))))
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
