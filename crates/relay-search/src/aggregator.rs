use std::time::Duration;

use log::{debug, info};
use reqwest::Client;

use crate::duckduckgo::{self, InstantLookup};
use crate::error::Result;
use crate::types::{EncyclopediaSummary, SearchResult};
use crate::wikipedia::{self, EncyclopediaEndpoint};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub instant_answer_url: String,
    /// Queried first, concurrently with the instant-answer lookup.
    pub primary: EncyclopediaEndpoint,
    /// Queried only when the primary edition yields nothing.
    pub fallback: Option<EncyclopediaEndpoint>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            instant_answer_url: duckduckgo::DEFAULT_ENDPOINT.to_string(),
            primary: EncyclopediaEndpoint::wikipedia("pt"),
            fallback: Some(EncyclopediaEndpoint::wikipedia("en")),
            user_agent: format!("chat-relay/{}", env!("CARGO_PKG_VERSION")),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Best-effort fan-out over the public lookup services. Individual failures
/// are logged and leave the corresponding field empty; `search` itself never
/// fails.
#[derive(Clone)]
pub struct SearchAggregator {
    client: Client,
    config: SearchConfig,
}

impl SearchAggregator {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: SearchConfig) -> Self {
        Self { client, config }
    }

    pub async fn search(&self, query: &str) -> SearchResult {
        let query = query.trim();
        if query.is_empty() {
            return SearchResult::default();
        }

        let (instant, primary) = futures::join!(
            self.instant_lookup(query),
            self.encyclopedia_lookup(&self.config.primary, query)
        );

        let wiki = match primary {
            Some(summary) => Some(summary),
            None => match &self.config.fallback {
                Some(fallback) => self.encyclopedia_lookup(fallback, query).await,
                None => None,
            },
        };

        let result = SearchResult {
            instant: instant.instant,
            wiki,
            related: instant.related,
        };
        info!(
            "search for {:?}: instant={} wiki={} related={}",
            query,
            result.instant.is_some(),
            result.wiki.as_ref().map(|w| w.lang.as_str()).unwrap_or("none"),
            result.related.len()
        );
        result
    }

    async fn instant_lookup(&self, query: &str) -> InstantLookup {
        let lookup: Result<InstantLookup> = duckduckgo::lookup(
            &self.client,
            &self.config.instant_answer_url,
            &self.config.user_agent,
            self.config.timeout,
            query,
        )
        .await;
        lookup.unwrap_or_else(|e| {
            debug!("instant answer lookup failed: {}", e);
            InstantLookup::default()
        })
    }

    async fn encyclopedia_lookup(
        &self,
        endpoint: &EncyclopediaEndpoint,
        query: &str,
    ) -> Option<EncyclopediaSummary> {
        match wikipedia::lookup(
            &self.client,
            endpoint,
            &self.config.user_agent,
            self.config.timeout,
            query,
        )
        .await
        {
            Ok(summary) => summary,
            Err(e) => {
                debug!("{} encyclopedia lookup failed: {}", endpoint.lang, e);
                None
            }
        }
    }
}
