use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use relay_server::config::{
    non_blank, ServerConfig, DEFAULT_PORT, DEFAULT_REFINE_ROUNDS, DEFAULT_REQUEST_TIMEOUT,
};
use relay_server::logging::init_logging;
use relay_server::run_server;

#[derive(Parser, Debug, Clone)]
#[command(name = "relay-server")]
#[command(about = "Multi-model chat completion relay")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Server port
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Provider API key
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "LLM_BASE_URL", default_value = relay_llm::DEFAULT_BASE_URL)]
    llm_base_url: String,

    /// Shared secret for GET /api/logs
    #[arg(long, env = "MONITOR_SECRET", hide_env_values = true)]
    monitor_secret: Option<String>,

    /// Directory for the persisted activity log (in-memory when unset)
    #[arg(long, env = "RELAY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Maximum activity entries kept
    #[arg(long, env = "RELAY_MAX_LOGS", default_value_t = relay_activity::DEFAULT_MAX_ENTRIES)]
    max_logs: usize,

    /// Refinement rounds in think mode
    #[arg(long, env = "RELAY_REFINE_ROUNDS", default_value_t = DEFAULT_REFINE_ROUNDS)]
    refine_rounds: usize,

    /// TOML model catalog replacing the built-in pools
    #[arg(long, env = "RELAY_MODELS_FILE")]
    models_file: Option<PathBuf>,

    /// Per-request timeout for outbound calls, in seconds
    #[arg(
        long,
        env = "RELAY_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs()
    )]
    request_timeout_secs: u64,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            port: cli.port,
            api_key: non_blank(cli.api_key),
            llm_base_url: cli.llm_base_url,
            monitor_secret: non_blank(cli.monitor_secret),
            data_dir: cli.data_dir,
            max_logs: cli.max_logs,
            refine_rounds: cli.refine_rounds,
            models_file: cli.models_file,
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if cli.log_level.is_some() {
        env_logger::init();
    } else {
        init_logging(cli.debug);
    }

    log::info!("Starting chat relay on port {}", cli.port);
    if cli.debug {
        log::debug!("Debug mode enabled");
        log::debug!("  LLM Base URL: {}", cli.llm_base_url);
        log::debug!("  Refine rounds: {}", cli.refine_rounds);
        log::debug!("  Max logs: {}", cli.max_logs);
    }

    run_server(ServerConfig::from(cli)).await
}
