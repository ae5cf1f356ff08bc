//! Wikipedia 百科检索，基于 MediaWiki Action API

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use super::{
    SearchAdapter, SearchError, SearchOutcome, ToolKind, build_http_client, join_url,
};
use crate::config::AdapterConfig;

const API_PATH: &str = "/w/api.php";
const SUMMARY_SENTENCES: &str = "3";

static LIST_ITEM_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<li\b([^>]*)>"#).expect("list item pattern is valid")
});
static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b([^>]*)>(.*?)</a>"#).expect("anchor pattern is valid")
});
static TITLE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\btitle="([^"]*)""#).expect("title attribute pattern is valid")
});
static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup pattern is valid"));

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PagesResponse {
    query: Option<PagesQuery>,
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<WikiPage>,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    extract: Option<String>,
    fullurl: Option<String>,
    pageprops: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    parse: Option<ParsedPage>,
}

#[derive(Debug, Deserialize)]
struct ParsedPage {
    #[serde(default)]
    text: String,
}

/// 单个条目的查询结果
enum PageLookup {
    Found { title: String, summary: String, url: String },
    Disambiguation,
    Missing,
}

/// 百科检索
pub struct WikipediaAdapter {
    config: AdapterConfig,
    client: reqwest::Client,
}

impl WikipediaAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self, SearchError> {
        let client = build_http_client(&config)?;
        Ok(Self { config, client })
    }

    async fn api_get<T>(&self, params: &[(&str, &str)]) -> Result<T, SearchError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(join_url(&self.config.base_url, API_PATH))
            .query(&[("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    async fn search_titles(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let limit = self.config.max_results.to_string();
        let response: SearchResponse = self
            .api_get(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("srprop", ""),
            ])
            .await?;

        Ok(response
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default())
    }

    async fn lookup_page(&self, title: &str) -> Result<PageLookup, SearchError> {
        let response: PagesResponse = self
            .api_get(&[
                ("action", "query"),
                ("prop", "extracts|info|pageprops"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("exsentences", SUMMARY_SENTENCES),
                ("inprop", "url"),
                ("ppprop", "disambiguation"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await?;

        let Some(page) = response.query.and_then(|q| q.pages.into_iter().next()) else {
            return Ok(PageLookup::Missing);
        };

        if page.missing || page.invalid {
            return Ok(PageLookup::Missing);
        }
        if page
            .pageprops
            .as_ref()
            .is_some_and(|props| props.contains_key("disambiguation"))
        {
            return Ok(PageLookup::Disambiguation);
        }

        let url = page.fullurl.unwrap_or_else(|| {
            join_url(
                &self.config.base_url,
                &format!("/wiki/{}", page.title.replace(' ', "_")),
            )
        });
        Ok(PageLookup::Found {
            title: page.title,
            summary: page.extract.unwrap_or_default().trim().to_string(),
            url,
        })
    }

    /// 消歧义页面中列出的候选条目，保持页面上的先后顺序
    ///
    /// `prop=links` 按字母排序，所以这里解析渲染后的正文。
    async fn disambiguation_options(&self, title: &str) -> Result<Vec<String>, SearchError> {
        let response: ParseResponse = self
            .api_get(&[
                ("action", "parse"),
                ("prop", "text"),
                ("redirects", "1"),
                ("page", title),
            ])
            .await?;

        Ok(response
            .parse
            .map(|page| list_item_links(&page.text))
            .unwrap_or_default())
    }

    /// 解析一个搜索结果，消歧义时退而取第一个候选，仍失败则放弃
    async fn resolve(&self, title: &str) -> Option<(String, String, String)> {
        match self.lookup_page(title).await {
            Ok(PageLookup::Found { title, summary, url }) => Some((title, summary, url)),
            Ok(PageLookup::Disambiguation) => {
                let options = match self.disambiguation_options(title).await {
                    Ok(options) => options,
                    Err(e) => {
                        tracing::debug!("获取消歧义候选失败 {}: {}", title, e);
                        return None;
                    }
                };
                let first = options.first()?;
                match self.lookup_page(first).await {
                    Ok(PageLookup::Found { title, summary, url }) => Some((title, summary, url)),
                    _ => {
                        tracing::debug!("消歧义候选 {} 仍无法解析，跳过", first);
                        None
                    }
                }
            }
            Ok(PageLookup::Missing) => {
                tracing::debug!("条目 {} 不存在，跳过", title);
                None
            }
            Err(e) => {
                tracing::debug!("获取条目 {} 失败: {}", title, e);
                None
            }
        }
    }
}

/// 每个列表项（目录项除外）中第一个链接指向的条目名
fn list_item_links(html: &str) -> Vec<String> {
    LIST_ITEM_OPEN
        .captures_iter(html)
        .filter(|caps| !caps[1].contains("tocsection"))
        .filter_map(|caps| {
            let start = caps.get(0)?.end();
            let body = &html[start..];
            let body = &body[..body.find("</li>").unwrap_or(body.len())];
            let anchor = ANCHOR.captures(body)?;
            let title = match TITLE_ATTR.captures(&anchor[1]) {
                Some(attr) => attr[1].to_string(),
                None => MARKUP.replace_all(&anchor[2], "").into_owned(),
            };
            let title = decode_entities(title.trim());
            (!title.is_empty()).then_some(title)
        })
        .collect()
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[async_trait]
impl SearchAdapter for WikipediaAdapter {
    fn kind(&self) -> ToolKind {
        ToolKind::Encyclopedia
    }

    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let titles = self.search_titles(query).await?;
        if titles.is_empty() {
            return Ok(SearchOutcome::default());
        }

        let mut items = Vec::new();
        for (i, title) in titles.iter().take(self.config.max_results).enumerate() {
            if let Some((resolved_title, summary, url)) = self.resolve(title).await {
                items.push(format!(
                    "\n**Article {}: {}**\nSummary: {}\nURL: {}\n",
                    i + 1,
                    resolved_title,
                    summary,
                    url
                ));
            }
        }

        let notice = items
            .is_empty()
            .then(|| format!("Could not retrieve Wikipedia content for query: {}", query));

        Ok(SearchOutcome {
            preamble: None,
            items,
            notice,
        })
    }

    fn no_results_message(&self, query: &str) -> String {
        format!("No Wikipedia articles found for query: {}", query)
    }

    fn error_message(&self, error: &SearchError) -> String {
        format!("Error searching Wikipedia: {}", error)
    }
}
