//! Tavily 网页检索，调研的默认工具

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    SearchAdapter, SearchError, SearchOutcome, ToolKind, build_http_client, join_url,
    truncate_chars,
};
use crate::config::AdapterConfig;

/// 单条结果内容的截断长度
const CONTENT_PREVIEW_CHARS: usize = 300;

#[derive(Debug, Serialize)]
struct TavilySearchRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
    include_answer: bool,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    answer: Option<String>,
    results: Option<Vec<TavilyResult>>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
}

/// 通用网页检索
pub struct TavilyAdapter {
    config: AdapterConfig,
    client: reqwest::Client,
}

impl TavilyAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self, SearchError> {
        let client = build_http_client(&config)?;
        Ok(Self { config, client })
    }

    fn format_result(index: usize, result: &TavilyResult) -> String {
        let content = result.content.as_deref().unwrap_or("No content");
        format!(
            "\n**Result {}:**\nTitle: {}\nContent: {}\nURL: {}\n",
            index,
            result.title.as_deref().unwrap_or("No title"),
            truncate_chars(content, CONTENT_PREVIEW_CHARS),
            result.url.as_deref().unwrap_or(""),
        )
    }
}

#[async_trait]
impl SearchAdapter for TavilyAdapter {
    fn kind(&self) -> ToolKind {
        ToolKind::Web
    }

    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        if self.config.api_key.trim().is_empty() {
            return Err(SearchError::MissingApiKey("Tavily"));
        }

        let request = TavilySearchRequest {
            query,
            search_depth: "advanced",
            max_results: self.config.max_results,
            include_answer: true,
            include_raw_content: false,
        };

        let response = self
            .client
            .post(join_url(&self.config.base_url, "/search"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: TavilySearchResponse = response.json().await?;

        // 没有results字段视为无结果，即便带有answer
        let Some(results) = body.results else {
            return Ok(SearchOutcome::default());
        };

        let preamble = body
            .answer
            .filter(|answer| !answer.trim().is_empty())
            .map(|answer| format!("**Summary Answer:** {}\n", answer));

        let items = results
            .iter()
            .take(self.config.max_results)
            .enumerate()
            .map(|(i, result)| Self::format_result(i + 1, result))
            .collect();

        Ok(SearchOutcome {
            preamble,
            items,
            notice: None,
        })
    }

    fn no_results_message(&self, query: &str) -> String {
        format!("No search results found for query: {}", query)
    }

    fn error_message(&self, error: &SearchError) -> String {
        format!("Error performing web search: {}", error)
    }
}
