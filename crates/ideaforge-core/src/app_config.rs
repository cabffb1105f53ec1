use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration, resolved once at startup from the environment.
///
/// Whether the relational backend is configured is fixed here —
/// `database_url` absent means every save/load goes straight to the snapshot
/// file for the life of the process.
#[derive(Clone)]
pub struct AppConfig {
    /// Primary (relational) backend. `None` ⇒ snapshot-only operation.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub log_level: String,

    /// Channels polled by the signal source, in fetch order.
    pub subreddits: Vec<String>,
    /// Per-channel listing limit passed to the hot endpoint.
    pub fetch_limit: u32,
    /// Default sample size for the signals surfaces (HTTP route and CLI).
    pub sample_count: usize,
    /// Upper bound on signals serialized into the relevance prompt.
    pub filter_cap: usize,
    pub fixture_path: PathBuf,
    pub snapshot_path: PathBuf,
    /// Politeness delay between per-channel requests.
    pub inter_request_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub user_agent: String,

    pub openai_api_key: Option<String>,
    pub llm_model: String,
    pub llm_base_url: String,
    pub llm_max_retries: u32,
    pub llm_backoff_base_ms: u64,

    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url.as_ref().map(|_| "[redacted]"))
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("subreddits", &self.subreddits)
            .field("fetch_limit", &self.fetch_limit)
            .field("sample_count", &self.sample_count)
            .field("filter_cap", &self.filter_cap)
            .field("fixture_path", &self.fixture_path)
            .field("snapshot_path", &self.snapshot_path)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("reddit_client_id", &self.reddit_client_id)
            .field(
                "reddit_client_secret",
                &self.reddit_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("user_agent", &self.user_agent)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_model", &self.llm_model)
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_max_retries", &self.llm_max_retries)
            .field("llm_backoff_base_ms", &self.llm_backoff_base_ms)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
