use std::sync::Arc;

use anyhow::Context;
use relay_activity::{
    ActivityLog, ActivityRecorder, ActivityStore, JsonFileActivityStore, MemoryActivityStore,
    DEFAULT_CHANNEL_CAPACITY,
};
use relay_core::{Capability, ModelCatalog};
use relay_llm::{CompletionClient, OpenAICompatClient, RefinementConfig};
use relay_search::{SearchAggregator, SearchConfig};

use crate::chat_service::ChatService;
use crate::config::ServerConfig;

pub struct AppState {
    pub chat: ChatService,
    pub search: SearchAggregator,
    pub recorder: ActivityRecorder,
    pub activity: ActivityLog,
    pub monitor_secret: Option<String>,
}

impl AppState {
    /// Assemble state from parts and start the activity worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        chat: ChatService,
        search: SearchAggregator,
        activity: ActivityLog,
        monitor_secret: Option<String>,
    ) -> Self {
        let (recorder, _worker) = ActivityRecorder::start(activity.clone(), DEFAULT_CHANNEL_CAPACITY);
        Self {
            chat,
            search,
            recorder,
            activity,
            monitor_secret,
        }
    }

    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let catalog = match &config.models_file {
            Some(path) => ModelCatalog::from_file(path)
                .with_context(|| format!("Failed to load model catalog from {:?}", path))?,
            None => ModelCatalog::default(),
        };
        log::info!(
            "Model catalog: {} text, {} vision",
            catalog.pool(Capability::Text).len(),
            catalog.pool(Capability::Vision).len()
        );

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("chat-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let client: Option<Arc<dyn CompletionClient>> = match &config.api_key {
            Some(key) => {
                log::info!("LLM base URL: {}", config.llm_base_url);
                Some(Arc::new(
                    OpenAICompatClient::new(key.clone())
                        .with_base_url(config.llm_base_url.clone())
                        .with_http_client(http.clone()),
                ))
            }
            None => {
                log::warn!("No API key configured; chat requests will fail");
                None
            }
        };

        let refinement = RefinementConfig {
            rounds: config.refine_rounds,
            ..RefinementConfig::default()
        };
        let chat = ChatService::new(Arc::new(catalog), client, refinement);

        let search = SearchAggregator::with_client(http, SearchConfig::default());

        let store: Arc<dyn ActivityStore> = match &config.data_dir {
            Some(dir) => {
                let store = JsonFileActivityStore::in_dir(dir);
                log::info!("Activity log at {:?}", store.path());
                Arc::new(store)
            }
            None => {
                log::info!("Activity log kept in memory");
                Arc::new(MemoryActivityStore::new())
            }
        };
        let activity = ActivityLog::new(store, config.max_logs);

        if config.monitor_secret.is_none() {
            log::warn!("MONITOR_SECRET not set; /api/logs is disabled");
        }

        Ok(Self::new(chat, search, activity, config.monitor_secret.clone()))
    }
}
