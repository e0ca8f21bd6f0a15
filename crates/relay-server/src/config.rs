use std::path::PathBuf;
use std::time::Duration;

use relay_activity::DEFAULT_MAX_ENTRIES;
use relay_llm::DEFAULT_BASE_URL;

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_REFINE_ROUNDS: usize = 3;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Provider credential. Requests needing a completion fail with 500 when absent.
    pub api_key: Option<String>,
    pub llm_base_url: String,
    /// Shared secret for the activity endpoint; unset means it always answers 401.
    pub monitor_secret: Option<String>,
    /// Where the activity log is persisted; in-memory when unset.
    pub data_dir: Option<PathBuf>,
    pub max_logs: usize,
    pub refine_rounds: usize,
    pub models_file: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: None,
            llm_base_url: DEFAULT_BASE_URL.to_string(),
            monitor_secret: None,
            data_dir: None,
            max_logs: DEFAULT_MAX_ENTRIES,
            refine_rounds: DEFAULT_REFINE_ROUNDS,
            models_file: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Treat blank env values the same as unset ones.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
