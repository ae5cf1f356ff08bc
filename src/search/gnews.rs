//! GNews 新闻检索

use async_trait::async_trait;
use serde::Deserialize;

use super::{
    SearchAdapter, SearchError, SearchOutcome, ToolKind, build_http_client, join_url,
};
use crate::config::AdapterConfig;

#[derive(Debug, Deserialize)]
struct GNewsResponse {
    #[serde(default)]
    articles: Vec<GNewsArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GNewsArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

/// 近期新闻检索
pub struct GNewsAdapter {
    config: AdapterConfig,
    client: reqwest::Client,
}

impl GNewsAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self, SearchError> {
        let client = build_http_client(&config)?;
        Ok(Self { config, client })
    }

    fn format_article(index: usize, article: &GNewsArticle) -> String {
        format!(
            "\nArticle {}:\nTitle: {}\nDescription: {}\nPublished: {}\nURL: {}\n",
            index,
            article.title.as_deref().unwrap_or("No title"),
            article.description.as_deref().unwrap_or("No description"),
            article.published_at.as_deref().unwrap_or(""),
            article.url.as_deref().unwrap_or(""),
        )
    }
}

#[async_trait]
impl SearchAdapter for GNewsAdapter {
    fn kind(&self) -> ToolKind {
        ToolKind::News
    }

    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        if self.config.api_key.trim().is_empty() {
            return Err(SearchError::MissingApiKey("GNews"));
        }

        let max = self.config.max_results.to_string();
        let response = self
            .client
            .get(join_url(&self.config.base_url, "/api/v4/search"))
            .query(&[
                ("q", query),
                ("token", self.config.api_key.as_str()),
                ("lang", "en"),
                ("country", "us"),
                ("max", max.as_str()),
                ("sortby", "relevance"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: GNewsResponse = response.json().await?;
        tracing::debug!("GNews返回 {} 篇文章", body.articles.len());

        let items = body
            .articles
            .iter()
            .take(self.config.max_results)
            .enumerate()
            .map(|(i, article)| Self::format_article(i + 1, article))
            .collect();

        Ok(SearchOutcome::from_items(items))
    }

    fn no_results_message(&self, query: &str) -> String {
        format!("No news articles found for query: {}", query)
    }

    fn error_message(&self, error: &SearchError) -> String {
        format!("Error fetching news: {}", error)
    }
}
