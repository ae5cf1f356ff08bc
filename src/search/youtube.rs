//! YouTube 视频检索
//!
//! 无需API KEY：抓取搜索结果页，从内嵌的 `ytInitialData` JSON 中提取 `videoRenderer` 条目。

use async_trait::async_trait;
use serde_json::Value;

use super::{
    SearchAdapter, SearchError, SearchOutcome, ToolKind, build_http_client, join_url,
};
use crate::config::AdapterConfig;

const INITIAL_DATA_MARKER: &str = "ytInitialData";
const WATCH_URL_PREFIX: &str = "https://www.youtube.com";

/// 从搜索结果页中解析出的视频
#[derive(Debug, Clone, PartialEq)]
pub struct VideoEntry {
    pub title: String,
    pub channel: String,
    pub duration: String,
    pub views: String,
    pub url_suffix: String,
}

/// 视频检索
pub struct YouTubeAdapter {
    config: AdapterConfig,
    client: reqwest::Client,
}

impl YouTubeAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self, SearchError> {
        let client = build_http_client(&config)?;
        Ok(Self { config, client })
    }

    fn format_video(index: usize, video: &VideoEntry) -> String {
        format!(
            "\n**Video {}:**\nTitle: {}\nChannel: {}\nDuration: {}\nViews: {}\nURL: {}{}\n",
            index,
            video.title,
            video.channel,
            video.duration,
            video.views,
            WATCH_URL_PREFIX,
            video.url_suffix,
        )
    }
}

/// 从结果页HTML中提取视频列表
pub fn parse_search_page(html: &str) -> Result<Vec<VideoEntry>, SearchError> {
    let marker = html.find(INITIAL_DATA_MARKER).ok_or_else(|| {
        SearchError::InvalidResponse("ytInitialData not found in results page".to_string())
    })?;
    let start = html[marker..]
        .find('{')
        .map(|offset| marker + offset)
        .ok_or_else(|| SearchError::InvalidResponse("ytInitialData has no JSON body".to_string()))?;

    // 只解析第一个完整的JSON值，忽略其后的脚本内容
    let data: Value = serde_json::Deserializer::from_str(&html[start..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| SearchError::InvalidResponse("empty ytInitialData".to_string()))?
        .map_err(|e| SearchError::InvalidResponse(format!("invalid ytInitialData: {}", e)))?;

    let mut renderers = Vec::new();
    collect_video_renderers(&data, &mut renderers);

    Ok(renderers.into_iter().filter_map(video_from_renderer).collect())
}

fn collect_video_renderers<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == "videoRenderer" {
                    out.push(child);
                } else {
                    collect_video_renderers(child, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_video_renderers(item, out);
            }
        }
        _ => {}
    }
}

/// 读取 `{"runs":[{"text":..}]}` 或 `{"simpleText":..}` 形式的文本
fn text_of(value: Option<&Value>) -> Option<String> {
    let value = value?;
    if let Some(simple) = value.get("simpleText").and_then(Value::as_str) {
        return Some(simple.to_string());
    }
    let runs = value.get("runs")?.as_array()?;
    let joined: String = runs
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();
    if joined.is_empty() { None } else { Some(joined) }
}

fn video_from_renderer(renderer: &Value) -> Option<VideoEntry> {
    let video_id = renderer.get("videoId").and_then(Value::as_str)?;
    let url_suffix = renderer
        .pointer("/navigationEndpoint/commandMetadata/webCommandMetadata/url")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("/watch?v={}", video_id));

    Some(VideoEntry {
        title: text_of(renderer.get("title")).unwrap_or_else(|| "No title".to_string()),
        channel: text_of(renderer.get("longBylineText"))
            .or_else(|| text_of(renderer.get("ownerText")))
            .unwrap_or_else(|| "Unknown channel".to_string()),
        duration: text_of(renderer.get("lengthText"))
            .unwrap_or_else(|| "Unknown duration".to_string()),
        views: text_of(renderer.get("viewCountText"))
            .unwrap_or_else(|| "Unknown views".to_string()),
        url_suffix,
    })
}

#[async_trait]
impl SearchAdapter for YouTubeAdapter {
    fn kind(&self) -> ToolKind {
        ToolKind::Video
    }

    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let html = self
            .client
            .get(join_url(&self.config.base_url, "/results"))
            .query(&[("search_query", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let videos = parse_search_page(&html)?;
        tracing::debug!("YouTube结果页解析出 {} 个视频", videos.len());

        let items = videos
            .iter()
            .take(self.config.max_results)
            .enumerate()
            .map(|(i, video)| Self::format_video(i + 1, video))
            .collect();

        Ok(SearchOutcome::from_items(items))
    }

    fn no_results_message(&self, query: &str) -> String {
        format!("No YouTube videos found for query: {}", query)
    }

    fn error_message(&self, error: &SearchError) -> String {
        format!("Error searching YouTube: {}", error)
    }
}
