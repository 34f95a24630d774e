use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Best-effort headline fetch. News is optional enrichment for the analyzer,
/// so every failure path degrades to empty text instead of erroring.
pub struct NewsFetcher {
    client: Client,
    api_url: String,
    api_key: String,
    page_size: u32,
}

impl NewsFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.news_request_timeout_secs))
            .build()
            .context("Failed to build news HTTP client")?;

        Ok(NewsFetcher {
            client,
            api_url: config.news_api_url.clone(),
            api_key: config.news_api_key.clone(),
            page_size: config.news_page_size,
        })
    }

    /// For testing: create fetcher with custom client and URL
    #[cfg(test)]
    fn with_client(client: Client, base_url: String, api_key: String, page_size: u32) -> Self {
        NewsFetcher {
            client,
            api_url: base_url,
            api_key,
            page_size,
        }
    }

    /// Fetch the most recent headlines for a ticker, newest first, joined as
    /// one "title. description" line per article. Returns "" when no API key
    /// is configured, on a non-success status, or on any transport error.
    pub async fn fetch(&self, ticker: &str) -> String {
        if self.api_key.is_empty() {
            debug!("NEWS_API_KEY not set — skipping news fetch for {}", ticker);
            return String::new();
        }

        let url = format!("{}/v2/everything", self.api_url);
        let page_size = self.page_size.to_string();
        let response = match self
            .client
            .get(&url)
            .query(&[
                ("q", ticker),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!("News fetch failed for {}: {}", ticker, e);
                return String::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("News API returned {} for {}", status, ticker);
            return String::new();
        }

        let body: NewsResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to parse news response for {}: {}", ticker, e);
                return String::new();
            }
        };

        let text = body
            .articles
            .iter()
            .take(self.page_size as usize)
            .map(|a| {
                format!(
                    "{}. {}",
                    a.title.as_deref().unwrap_or(""),
                    a.description.as_deref().unwrap_or(""),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            "Fetched {} articles for {} ({} chars)",
            body.articles.len().min(self.page_size as usize),
            ticker,
            text.len(),
        );
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn article_json(title: &str, description: &str) -> serde_json::Value {
        serde_json::json!({"title": title, "description": description})
    }

    #[tokio::test]
    async fn test_fetch_joins_title_and_description() {
        let server = MockServer::start().await;
        let fetcher =
            NewsFetcher::with_client(Client::new(), server.uri(), "test-key".to_string(), 5);

        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "NVDA"))
            .and(query_param("language", "en"))
            .and(query_param("sortBy", "publishedAt"))
            .and(query_param("pageSize", "5"))
            .and(query_param("apiKey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "articles": [
                    article_json("Nvidia beats estimates", "Record data center revenue."),
                    article_json("Chips rally", "Semis up across the board."),
                ]
            })))
            .mount(&server)
            .await;

        let text = fetcher.fetch("NVDA").await;
        assert_eq!(
            text,
            "Nvidia beats estimates. Record data center revenue.\nChips rally. Semis up across the board."
        );
    }

    #[tokio::test]
    async fn test_missing_key_skips_request() {
        // Point at a server with no mocks mounted: any request would 404 and
        // leave a received request behind.
        let server = MockServer::start().await;
        let fetcher = NewsFetcher::with_client(Client::new(), server.uri(), String::new(), 5);

        let text = fetcher.fetch("BTC").await;
        assert_eq!(text, "");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_returns_empty() {
        let server = MockServer::start().await;
        let fetcher =
            NewsFetcher::with_client(Client::new(), server.uri(), "test-key".to_string(), 5);

        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        assert_eq!(fetcher.fetch("LMT").await, "");
    }

    #[tokio::test]
    async fn test_transport_error_returns_empty() {
        // Nothing listening on this port
        let fetcher = NewsFetcher::with_client(
            Client::new(),
            "http://127.0.0.1:1".to_string(),
            "test-key".to_string(),
            5,
        );
        assert_eq!(fetcher.fetch("ETH").await, "");
    }

    #[tokio::test]
    async fn test_missing_fields_treated_as_empty() {
        let server = MockServer::start().await;
        let fetcher =
            NewsFetcher::with_client(Client::new(), server.uri(), "test-key".to_string(), 5);

        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "articles": [
                    {"title": "Headline only"},
                    {"description": "Description only"},
                    {},
                ]
            })))
            .mount(&server)
            .await;

        let text = fetcher.fetch("MRK").await;
        assert_eq!(text, "Headline only. \n. Description only\n. ");
    }

    #[tokio::test]
    async fn test_truncates_to_page_size() {
        let server = MockServer::start().await;
        let fetcher =
            NewsFetcher::with_client(Client::new(), server.uri(), "test-key".to_string(), 2);

        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "articles": [
                    article_json("one", "1"),
                    article_json("two", "2"),
                    article_json("three", "3"),
                ]
            })))
            .mount(&server)
            .await;

        let text = fetcher.fetch("PLTR").await;
        assert_eq!(text, "one. 1\ntwo. 2");
    }

    #[tokio::test]
    async fn test_empty_articles_list() {
        let server = MockServer::start().await;
        let fetcher =
            NewsFetcher::with_client(Client::new(), server.uri(), "test-key".to_string(), 5);

        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"articles": []})),
            )
            .mount(&server)
            .await;

        assert_eq!(fetcher.fetch("SMCI").await, "");
    }
}
