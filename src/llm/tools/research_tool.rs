//! 调研工具 - 把搜索适配器暴露为模型可调用的函数，并记录每次调用

use std::marker::PhantomData;
use std::sync::Arc;

use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::search::{SearchToolbox, ToolKind};

/// 一次工具调用记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub kind: ToolKind,
    pub query: String,
}

#[derive(Debug, Error)]
pub enum ResearchToolError {
    #[error("research tool {0} is not available")]
    Unavailable(&'static str),
}

/// 单次调研的工具会话：可用的适配器加上调用日志
#[derive(Clone)]
pub struct ToolSession {
    toolbox: SearchToolbox,
    invocations: Arc<Mutex<Vec<ToolInvocation>>>,
}

impl ToolSession {
    pub fn new(toolbox: SearchToolbox) -> Self {
        Self {
            toolbox,
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn available(&self) -> Vec<ToolKind> {
        self.toolbox.kinds()
    }

    /// 调用工具并记录，失败的检索同样计入日志
    pub async fn invoke(&self, kind: ToolKind, query: &str) -> Result<String, ResearchToolError> {
        let adapter = self
            .toolbox
            .adapter(kind)
            .ok_or(ResearchToolError::Unavailable(kind.tool_name()))?;

        self.invocations.lock().await.push(ToolInvocation {
            kind,
            query: query.to_string(),
        });
        tracing::debug!(tool = kind.tool_name(), query, "工具调用");

        Ok(adapter.search_text(query).await)
    }

    pub async fn invocations(&self) -> Vec<ToolInvocation> {
        self.invocations.lock().await.clone()
    }
}

/// 工具参数
#[derive(Debug, Deserialize)]
pub struct SearchArgs {
    pub query: String,
}

/// 标识工具对应的适配器类型
pub trait ToolSpec: Send + Sync + 'static {
    const KIND: ToolKind;
}

pub struct NewsSpec;
pub struct WebSpec;
pub struct VideoSpec;
pub struct EncyclopediaSpec;

impl ToolSpec for NewsSpec {
    const KIND: ToolKind = ToolKind::News;
}

impl ToolSpec for WebSpec {
    const KIND: ToolKind = ToolKind::Web;
}

impl ToolSpec for VideoSpec {
    const KIND: ToolKind = ToolKind::Video;
}

impl ToolSpec for EncyclopediaSpec {
    const KIND: ToolKind = ToolKind::Encyclopedia;
}

/// 绑定到某个工具会话的调研工具
pub struct ResearchTool<S: ToolSpec> {
    session: ToolSession,
    _spec: PhantomData<S>,
}

impl<S: ToolSpec> ResearchTool<S> {
    pub fn new(session: ToolSession) -> Self {
        Self {
            session,
            _spec: PhantomData,
        }
    }
}

impl<S: ToolSpec> Clone for ResearchTool<S> {
    fn clone(&self) -> Self {
        Self::new(self.session.clone())
    }
}

impl<S: ToolSpec> Tool for ResearchTool<S> {
    const NAME: &'static str = S::KIND.tool_name();

    type Error = ResearchToolError;
    type Args = SearchArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: S::KIND.description().to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search keywords or question describing what to look up"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        self.session.invoke(S::KIND, &args.query).await
    }
}

/// 挂载到Agent上的全部调研工具
#[derive(Clone)]
pub struct ResearchToolset {
    pub news: ResearchTool<NewsSpec>,
    pub web: ResearchTool<WebSpec>,
    pub video: ResearchTool<VideoSpec>,
    pub encyclopedia: ResearchTool<EncyclopediaSpec>,
}

impl ResearchToolset {
    pub fn new(session: &ToolSession) -> Self {
        Self {
            news: ResearchTool::new(session.clone()),
            web: ResearchTool::new(session.clone()),
            video: ResearchTool::new(session.clone()),
            encyclopedia: ResearchTool::new(session.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchAdapter, SearchError, SearchOutcome};
    use async_trait::async_trait;

    struct CannedAdapter(ToolKind);

    #[async_trait]
    impl SearchAdapter for CannedAdapter {
        fn kind(&self) -> ToolKind {
            self.0
        }

        async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
            Ok(SearchOutcome::from_items(vec![format!("result for {}", query)]))
        }

        fn no_results_message(&self, query: &str) -> String {
            format!("nothing for {}", query)
        }

        fn error_message(&self, error: &SearchError) -> String {
            format!("Error: {}", error)
        }
    }

    fn session_with(kinds: &[ToolKind]) -> ToolSession {
        let toolbox = kinds.iter().fold(SearchToolbox::empty(), |toolbox, kind| {
            toolbox.with_adapter(Arc::new(CannedAdapter(*kind)))
        });
        ToolSession::new(toolbox)
    }

    #[test]
    fn test_tool_names_follow_kind() {
        assert_eq!(ResearchTool::<NewsSpec>::NAME, "gnews_search");
        assert_eq!(ResearchTool::<WebSpec>::NAME, "tavily_search");
        assert_eq!(ResearchTool::<VideoSpec>::NAME, "youtube_search");
        assert_eq!(ResearchTool::<EncyclopediaSpec>::NAME, "wikipedia_search");
    }

    #[tokio::test]
    async fn test_calls_are_recorded_in_order() {
        let session = session_with(&[ToolKind::Web, ToolKind::Video]);
        let toolset = ResearchToolset::new(&session);

        let web = toolset
            .web
            .call(SearchArgs {
                query: "ai tools".to_string(),
            })
            .await
            .unwrap();
        toolset
            .video
            .call(SearchArgs {
                query: "ai demo".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(web, "result for ai tools");
        let invocations = session.invocations().await;
        assert_eq!(invocations.len(), 2);
        assert_eq!(invocations[0].kind, ToolKind::Web);
        assert_eq!(invocations[1].query, "ai demo");
    }

    #[tokio::test]
    async fn test_unavailable_tool_is_not_recorded() {
        let session = session_with(&[ToolKind::Web]);
        let result = session.invoke(ToolKind::News, "markets").await;

        assert!(matches!(
            result,
            Err(ResearchToolError::Unavailable("gnews_search"))
        ));
        assert!(session.invocations().await.is_empty());
    }

    #[tokio::test]
    async fn test_definition_describes_query_parameter() {
        let session = session_with(&[ToolKind::Encyclopedia]);
        let tool = ResearchTool::<EncyclopediaSpec>::new(session);
        let definition = tool.definition(String::new()).await;

        assert_eq!(definition.name, "wikipedia_search");
        assert!(definition.description.contains("Wikipedia"));
        assert_eq!(definition.parameters["required"][0], "query");
    }
}
