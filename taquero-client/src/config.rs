//! Client configuration

/// Default request timeout (the web app can take a few seconds to wake up)
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Client configuration for the spreadsheet web app
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Web app URL (e.g. "https://script.google.com/macros/s/<id>/exec")
    pub endpoint: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// Value sent as `User-Agent`
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: concat!("taquero/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Create a client from this configuration
    pub fn build_client(&self) -> crate::ClientResult<crate::SheetsClient> {
        crate::SheetsClient::new(self)
    }
}
