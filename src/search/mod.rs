//! 搜索适配器 - 把各家检索服务统一为 query -> 文本 的接口

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{AdapterConfig, SearchConfig};

pub mod gnews;
pub mod tavily;
pub mod wikipedia;
pub mod youtube;

pub use gnews::GNewsAdapter;
pub use tavily::TavilyAdapter;
pub use wikipedia::WikipediaAdapter;
pub use youtube::YouTubeAdapter;

/// 调研工具类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    News,
    Web,
    Video,
    Encyclopedia,
    #[default]
    None,
}

impl ToolKind {
    /// 所有可调用的工具，按注册顺序排列
    pub const ALL: [ToolKind; 4] = [
        ToolKind::News,
        ToolKind::Web,
        ToolKind::Video,
        ToolKind::Encyclopedia,
    ];

    /// 暴露给模型的函数名
    pub const fn tool_name(&self) -> &'static str {
        match self {
            ToolKind::News => "gnews_search",
            ToolKind::Web => "tavily_search",
            ToolKind::Video => "youtube_search",
            ToolKind::Encyclopedia => "wikipedia_search",
            ToolKind::None => "none",
        }
    }

    /// 面向用户的展示名称
    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::News => "GNews Search",
            ToolKind::Web => "Tavily Web Search",
            ToolKind::Video => "YouTube Search",
            ToolKind::Encyclopedia => "Wikipedia Search",
            ToolKind::None => "None",
        }
    }

    pub fn from_tool_name(name: &str) -> Option<ToolKind> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.tool_name() == name)
    }

    /// 工具说明，模型据此判断何时调用
    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::News => {
                "Search for recent news articles using keywords. Returns top 3-5 relevant articles with titles and summaries. Use for recent events, breaking news and timely industry developments."
            }
            ToolKind::Web => {
                "Search the web for comprehensive information, articles, tutorials, and expert opinions. Best for general questions, lists, explanations, and evergreen content. This is the default tool."
            }
            ToolKind::Video => {
                "Search YouTube for video content, tutorials, reviews, and expert discussions. Best for finding educational content and visual explanations."
            }
            ToolKind::Encyclopedia => {
                "Search Wikipedia for definitions, historical context, foundational knowledge about topics, people, or companies. Best for factual information and background context."
            }
            ToolKind::None => "",
        }
    }

    /// 根据实际调用的工具生成选择理由
    pub fn selection_reasoning(&self, field: &str) -> String {
        match self {
            ToolKind::News => format!("Selected news search for recent developments in: {}", field),
            ToolKind::Web => format!(
                "Selected web search for comprehensive information on: {}",
                field
            ),
            ToolKind::Video => format!(
                "Selected video search for tutorials/discussions on: {}",
                field
            ),
            ToolKind::Encyclopedia => format!(
                "Selected Wikipedia for foundational knowledge on: {}",
                field
            ),
            ToolKind::None => format!("Analyzed query: {}", field),
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "news" | "gnews" | "gnews_search" => Ok(ToolKind::News),
            "web" | "tavily" | "tavily_search" => Ok(ToolKind::Web),
            "video" | "youtube" | "youtube_search" => Ok(ToolKind::Video),
            "encyclopedia" | "wikipedia" | "wikipedia_search" => Ok(ToolKind::Encyclopedia),
            _ => Err(format!("Unknown research tool: {}", s)),
        }
    }
}

/// 搜索适配器错误
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// 一次检索的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    /// 位于条目之前的摘要（如Tavily的答案）
    pub preamble: Option<String>,
    /// 每个结果条目格式化后的文本块
    pub items: Vec<String>,
    /// 结果为空时替换默认提示的说明
    pub notice: Option<String>,
}

impl SearchOutcome {
    pub fn from_items(items: Vec<String>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.preamble.is_none()
    }

    pub fn render(&self) -> String {
        let mut blocks = Vec::with_capacity(self.items.len() + 1);
        if let Some(preamble) = &self.preamble {
            blocks.push(preamble.clone());
        }
        blocks.extend(self.items.iter().cloned());
        blocks.join("\n")
    }
}

/// 统一的检索接口
#[async_trait]
pub trait SearchAdapter: Send + Sync {
    fn kind(&self) -> ToolKind;

    /// 执行检索，返回结构化结果
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError>;

    /// 没有结果时的提示
    fn no_results_message(&self, query: &str) -> String;

    /// 检索失败时的提示
    fn error_message(&self, error: &SearchError) -> String;

    /// 永不失败的文本版本，错误与空结果都转换为可读文本
    async fn search_text(&self, query: &str) -> String {
        if query.trim().is_empty() {
            return self.no_results_message(query);
        }

        match self.search(query).await {
            Ok(outcome) if outcome.is_empty() => outcome
                .notice
                .unwrap_or_else(|| self.no_results_message(query)),
            Ok(outcome) => outcome.render(),
            Err(e) => {
                tracing::warn!(tool = self.kind().tool_name(), "检索失败: {}", e);
                self.error_message(&e)
            }
        }
    }
}

/// 根据适配器配置构建HTTP客户端
pub(crate) fn build_http_client(config: &AdapterConfig) -> Result<reqwest::Client, SearchError> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        "Mozilla/5.0 (compatible; content-strategist/",
        env!("CARGO_PKG_VERSION"),
        ")"
    ));
    if let Some(seconds) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(seconds));
    }
    Ok(builder.build()?)
}

/// 拼接基地址与路径，容忍多余的斜杠
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// 按字符截断文本，超出时追加省略号
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// 四个检索适配器的集合
#[derive(Clone)]
pub struct SearchToolbox {
    adapters: HashMap<ToolKind, Arc<dyn SearchAdapter>>,
}

impl SearchToolbox {
    /// 根据配置创建全部适配器
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self::empty()
            .with_adapter(Arc::new(GNewsAdapter::new(config.gnews.clone())?))
            .with_adapter(Arc::new(TavilyAdapter::new(config.tavily.clone())?))
            .with_adapter(Arc::new(YouTubeAdapter::new(config.youtube.clone())?))
            .with_adapter(Arc::new(WikipediaAdapter::new(config.wikipedia.clone())?)))
    }

    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// 注册或替换同类型的适配器
    pub fn with_adapter(mut self, adapter: Arc<dyn SearchAdapter>) -> Self {
        self.adapters.insert(adapter.kind(), adapter);
        self
    }

    pub fn adapter(&self, kind: ToolKind) -> Option<Arc<dyn SearchAdapter>> {
        self.adapters.get(&kind).cloned()
    }

    /// 已注册的工具，按固定顺序返回
    pub fn kinds(&self) -> Vec<ToolKind> {
        ToolKind::ALL
            .into_iter()
            .filter(|kind| self.adapters.contains_key(kind))
            .collect()
    }
}
