use anyhow::{Result, anyhow};
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    config::Endpoints,
    model::{EncyclopediaPage, EncyclopediaSummary},
    transport::{HttpRequest, Transport, fetch_json},
};

/// Title search -> page summary lookup against the Wikipedia REST API.
#[derive(Debug, Clone)]
pub struct EncyclopediaLookup {
    transport: Arc<dyn Transport>,
    search_url: String,
    summary_url: String,
}

impl EncyclopediaLookup {
    pub fn new(transport: Arc<dyn Transport>, endpoints: &Endpoints) -> Self {
        Self {
            transport,
            search_url: endpoints.encyclopedia_search_url.clone(),
            summary_url: endpoints.encyclopedia_summary_url.clone(),
        }
    }

    pub async fn summary_for(&self, topic: &str) -> Result<String> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Ok("Please provide a topic to look up.".to_string());
        }

        let Some(page) = self.search(topic).await? else {
            return Ok(format!("I couldn't find anything about \"{topic}\" on Wikipedia."));
        };

        let summary = self.summary(&page.title).await?;

        let mut reply = format!("{}: {}", summary.title, summary.extract);
        if let Some(url) = summary.canonical_url {
            reply.push_str(&format!("\n\nMore: {url}"));
        }
        Ok(reply)
    }

    pub async fn search(&self, topic: &str) -> Result<Option<EncyclopediaPage>> {
        let request = HttpRequest::get(&self.search_url)
            .query("q", topic)
            .query("limit", 1);

        let parsed: WpSearchResponse = fetch_json(self.transport.as_ref(), request).await?;
        Ok(parsed.pages.into_iter().next())
    }

    /// Summary for an exact page title.
    pub async fn summary(&self, title: &str) -> Result<EncyclopediaSummary> {
        let url = summary_url(&self.summary_url, title)?;

        let parsed: WpSummary = fetch_json(self.transport.as_ref(), HttpRequest::get(url)).await?;

        Ok(EncyclopediaSummary {
            title: parsed.title,
            extract: parsed.extract,
            canonical_url: parsed
                .content_urls
                .and_then(|urls| urls.desktop)
                .and_then(|desktop| desktop.page)
                .filter(|page| !page.is_empty()),
        })
    }
}

/// Appends `title` as a single percent-encoded path segment.
fn summary_url(base: &str, title: &str) -> Result<String> {
    let mut url = Url::parse(base).map_err(|e| anyhow!("Invalid summary URL '{base}': {e}"))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Summary URL '{base}' cannot take a path"))?
        .pop_if_empty()
        .push(title);
    Ok(url.into())
}

#[derive(Debug, Deserialize)]
struct WpSearchResponse {
    #[serde(default)]
    pages: Vec<EncyclopediaPage>,
}

#[derive(Debug, Deserialize)]
struct WpDesktopUrls {
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WpContentUrls {
    desktop: Option<WpDesktopUrls>,
}

#[derive(Debug, Deserialize)]
struct WpSummary {
    title: String,
    #[serde(default)]
    extract: String,
    content_urls: Option<WpContentUrls>,
}
