use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration, loaded from `ARREDO_*` environment variables.
///
/// Every knob has a default so the CLI works out of the box against the
/// public catalog site.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Per-request timeout for page and fragment fetches.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base * 2^attempt` seconds.
    pub retry_backoff_base_secs: u64,
    /// Pause between URLs in a batch run.
    pub inter_request_delay_ms: u64,
    /// Bounded wait for lazily-revealed page sections.
    pub reveal_timeout_secs: u64,
    /// URL-index document listing candidate product URLs.
    pub sitemap_url: String,
    /// Directory for persisted JSON records.
    pub output_dir: PathBuf,
}
