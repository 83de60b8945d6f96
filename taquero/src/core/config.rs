use std::path::PathBuf;

/// Application configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATA_DIR | ./taquero-data | Local record storage (one JSON file per domain) |
/// | SHEETS_URL | (unset) | Spreadsheet web app URL; unset means offline mode |
/// | OPERATOR | kitchen | Name written to `createdBy` / `updatedBy` |
/// | REQUEST_TIMEOUT_MS | 15000 | Remote request timeout |
/// | SYNC_SETTLE_MS | 2000 | How long to wait for queued writes before a reload |
/// | LOG_LEVEL | info | Log level (overridden by RUST_LOG) |
/// | LOG_DIR | (unset) | Write logs to a daily rolling file in this directory |
/// | LOG_JSON | false | JSON log lines |
/// | ENVIRONMENT | development | development / production |
///
/// # Example
///
/// ```ignore
/// DATA_DIR=/srv/taquero SHEETS_URL=https://script.google.com/macros/s/xyz/exec taquero list events
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub sheets_url: Option<String>,
    pub operator: String,
    pub request_timeout_ms: u64,
    pub sync_settle_ms: u64,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub log_json: bool,
    /// development | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./taquero-data")),
            sheets_url: std::env::var("SHEETS_URL")
                .ok()
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            operator: std::env::var("OPERATOR").unwrap_or_else(|_| "kitchen".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15_000),
            sync_settle_ms: std::env::var("SYNC_SETTLE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2_000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().map(PathBuf::from),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Offline configuration rooted at `data_dir`
    ///
    /// Used by tests and one-off imports.
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sheets_url: None,
            operator: "kitchen".into(),
            request_timeout_ms: 15_000,
            sync_settle_ms: 2_000,
            log_level: "info".into(),
            log_dir: None,
            log_json: false,
            environment: "development".into(),
        }
    }

    pub fn with_sheets_url(mut self, url: impl Into<String>) -> Self {
        self.sheets_url = Some(url.into());
        self
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Whether writes are mirrored to the sheet
    pub fn sync_enabled(&self) -> bool {
        self.sheets_url.is_some()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_config_is_offline() {
        let config = Config::local("/tmp/taquero-test");
        assert!(!config.sync_enabled());
        assert_eq!(config.data_dir, PathBuf::from("/tmp/taquero-test"));
        assert_eq!(config.sync_settle_ms, 2_000);
    }

    #[test]
    fn test_builders() {
        let config = Config::local("/tmp/x")
            .with_sheets_url("https://example.com/exec")
            .with_operator("maria");
        assert!(config.sync_enabled());
        assert_eq!(config.operator, "maria");
        assert!(!config.is_production());
    }
}
