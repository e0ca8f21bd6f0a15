//! Wikipedia REST page-summary lookups.

use std::time::Duration;

use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{Result, SearchError};
use crate::types::EncyclopediaSummary;

/// One language edition of the encyclopedia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncyclopediaEndpoint {
    /// REST root, e.g. `https://pt.wikipedia.org/api/rest_v1`
    pub base_url: String,
    pub lang: String,
}

impl EncyclopediaEndpoint {
    pub fn wikipedia(lang: &str) -> Self {
        Self {
            base_url: format!("https://{lang}.wikipedia.org/api/rest_v1"),
            lang: lang.to_string(),
        }
    }

    fn summary_url(&self, query: &str) -> Result<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| SearchError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SearchError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["page", "summary", query]);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    #[serde(default)]
    desktop: Option<PageUrls>,
}

#[derive(Debug, Deserialize)]
struct PageUrls {
    #[serde(default)]
    page: Option<String>,
}

impl SummaryResponse {
    fn into_summary(self, query: &str, lang: &str) -> Option<EncyclopediaSummary> {
        if self.extract.trim().is_empty() {
            return None;
        }
        let title = if self.title.trim().is_empty() {
            query.to_string()
        } else {
            self.title
        };
        Some(EncyclopediaSummary {
            title,
            text: self.extract,
            url: self
                .content_urls
                .and_then(|urls| urls.desktop)
                .and_then(|desktop| desktop.page),
            lang: lang.to_string(),
        })
    }
}

/// `Ok(None)` when the page exists but has no usable extract.
pub(crate) async fn lookup(
    client: &Client,
    endpoint: &EncyclopediaEndpoint,
    user_agent: &str,
    timeout: Duration,
    query: &str,
) -> Result<Option<EncyclopediaSummary>> {
    let response = client
        .get(endpoint.summary_url(query)?)
        .header(USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::Status(status.as_u16()));
    }

    let parsed: SummaryResponse = response.json().await?;
    Ok(parsed.into_summary(query, &endpoint.lang))
}
