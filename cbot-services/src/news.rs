//! Headlines collaborator: fetches top headlines by category and/or query
//! and renders the numbered display string itself, error messages included.

use cbot_core::{BotError, NewsCategory};
use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_NEWS_BASE_URL: &str = "https://newsapi.org/v2";

const MSG_MISSING_KEY: &str = "News API key is missing. Please configure it.";
const MSG_NO_ARTICLES: &str = "I couldn't find any news articles matching your request.";

const PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSource {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    pub title: Option<String>,
    pub source: Option<ArticleSource>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    status: String,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

/// Client for the headlines API. Base URL is overridable for tests.
#[derive(Clone)]
pub struct NewsService {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl NewsService {
    pub fn new(api_key: Option<String>) -> cbot_core::Result<Self> {
        Self::with_base_url(api_key, DEFAULT_NEWS_BASE_URL)
    }

    pub fn with_base_url(
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> cbot_core::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| BotError::Config(format!("news HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
        })
    }

    /// Fetches headlines and renders the reply, folding every failure into
    /// an apologetic message.
    pub async fn headlines_reply(
        &self,
        category: Option<NewsCategory>,
        query: Option<&str>,
    ) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("news API key is missing");
            return MSG_MISSING_KEY.to_string();
        };

        info!(category = ?category.map(|c| c.as_str()), query = ?query, "fetching headlines");

        let mut params: Vec<(&str, String)> = vec![
            ("apiKey", api_key.to_string()),
            ("country", "us".to_string()),
            ("pageSize", PAGE_SIZE.to_string()),
        ];
        if let Some(category) = category {
            params.push(("category", category.as_str().to_string()));
        }
        if let Some(query) = query {
            params.push(("q", query.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/top-headlines", self.base_url))
            .query(&params)
            .send()
            .await;

        let data: HeadlinesResponse = match response {
            Ok(response) if response.status().is_success() => match response.json().await {
                Ok(data) => data,
                Err(e) => {
                    warn!(error = %e, "malformed headlines payload");
                    return apology(&e.to_string());
                }
            },
            Ok(response) => {
                let status = response.status();
                warn!(status = %status, "headlines HTTP error");
                return apology(&format!("HTTP {}", status));
            }
            Err(e) => {
                warn!(error = %e, "headlines request failed");
                return apology(&e.to_string());
            }
        };

        if data.status != "ok" {
            let reason = data
                .message
                .unwrap_or_else(|| "Failed to fetch news".to_string());
            warn!(reason = %reason, "headlines API reported an error");
            return apology(&reason);
        }
        if data.articles.is_empty() {
            return MSG_NO_ARTICLES.to_string();
        }
        render_articles(&data.articles)
    }
}

fn apology(reason: &str) -> String {
    format!("Sorry, I couldn't fetch the news: {}", reason)
}

/// Numbered article list: title, source in parentheses, and a "Read more"
/// line per article, capped at [`PAGE_SIZE`].
fn render_articles(articles: &[Article]) -> String {
    let mut out = String::from("Here are the latest headlines:\n\n");
    for (i, article) in articles.iter().take(PAGE_SIZE).enumerate() {
        let title = article.title.as_deref().unwrap_or("No title");
        let source = article
            .source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or("Unknown source");
        out.push_str(&format!("{}. {} ({})\n", i + 1, title, source));
        if let Some(url) = article.url.as_deref().filter(|u| !u.is_empty()) {
            out.push_str(&format!("   Read more: {}\n", url));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, source: Option<&str>, url: Option<&str>) -> Article {
        Article {
            title: Some(title.to_string()),
            source: source.map(|name| ArticleSource {
                name: Some(name.to_string()),
            }),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn renders_numbered_list_with_sources_and_links() {
        let articles = vec![
            article("Rust 2.0 announced", Some("The Register"), Some("https://example.com/rust")),
            article("Markets rally", Some("Reuters"), None),
        ];
        let out = render_articles(&articles);
        assert!(out.starts_with("Here are the latest headlines:\n\n"));
        assert!(out.contains("1. Rust 2.0 announced (The Register)\n"));
        assert!(out.contains("   Read more: https://example.com/rust\n"));
        assert!(out.contains("2. Markets rally (Reuters)\n"));
    }

    #[test]
    fn missing_fields_fall_back_to_placeholders() {
        let articles = vec![Article {
            title: None,
            source: None,
            url: None,
        }];
        let out = render_articles(&articles);
        assert!(out.contains("1. No title (Unknown source)"));
        assert!(!out.contains("Read more"));
    }

    #[test]
    fn list_is_capped_at_five_articles() {
        let articles: Vec<Article> = (0..8)
            .map(|i| article(&format!("Story {}", i), Some("Wire"), None))
            .collect();
        let out = render_articles(&articles);
        assert!(out.contains("5. Story 4 (Wire)"));
        assert!(!out.contains("6. Story 5"));
    }
}
