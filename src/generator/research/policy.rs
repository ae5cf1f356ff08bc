//! 工具选择策略 - 决定调研阶段调用哪个检索适配器

use async_trait::async_trait;

use crate::config::PolicyKind;
use crate::generator::context::GeneratorContext;
use crate::generator::types::PipelineError;
use crate::llm::{CompletionRequest, ReActConfig, ToolSession};
use crate::search::ToolKind;

const RESEARCH_SYSTEM_PROMPT: &str = r#"You are a highly intelligent research assistant. Your goal is to find the most accurate and insightful information for a given topic to help create a LinkedIn post.

You have access to these tools:
- **gnews_search**: For recent events, breaking news, and timely industry developments
- **tavily_search**: For general questions, lists, explanations, tutorials, and comprehensive web content (PRIMARY TOOL)
- **youtube_search**: For video content, tutorials, reviews, and expert discussions
- **wikipedia_search**: For definitions, historical context, and foundational knowledge

**Your Reasoning Process:**
1. Analyze the user's request carefully
2. Determine which tool will provide the most valuable information
3. Use this decision logic:
   - Recent events/breaking news → **gnews_search**
   - General questions, "best tools for...", "how to...", lists, opinions → **tavily_search** (DEFAULT)
   - Complex terms needing definition, historical entities, company backgrounds → **wikipedia_search**
   - Video tutorials, reviews, visual content → **youtube_search**
4. Execute the chosen tool and provide comprehensive results

**Important:** Always explain your tool choice in your thought process. Be thorough in your research to provide rich content for LinkedIn post creation.

Begin your analysis and tool selection:"#;

/// 调研阶段的工具选择策略
///
/// 策略通过 `session` 调用工具，返回调研的最终文本；调用记录由选择器读取。
#[async_trait]
pub trait SelectionPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(
        &self,
        context: &GeneratorContext,
        field: &str,
        session: &ToolSession,
    ) -> Result<String, PipelineError>;
}

/// 根据配置选择策略，`forced_tool` 优先
pub fn policy_from_config(context: &GeneratorContext) -> Box<dyn SelectionPolicy> {
    let research = &context.config.research;
    match (research.forced_tool, research.policy) {
        (Some(kind), _) if kind != ToolKind::None => Box::new(FixedToolPolicy::new(kind)),
        (_, PolicyKind::Keyword) => Box::new(KeywordHeuristicPolicy),
        (_, PolicyKind::Reasoning) => Box::new(RemoteReasoningPolicy),
    }
}

/// 由模型在ReAct循环中自行挑选工具
pub struct RemoteReasoningPolicy;

#[async_trait]
impl SelectionPolicy for RemoteReasoningPolicy {
    fn name(&self) -> &'static str {
        "reasoning"
    }

    async fn run(
        &self,
        context: &GeneratorContext,
        field: &str,
        session: &ToolSession,
    ) -> Result<String, PipelineError> {
        let request = CompletionRequest {
            system_prompt: RESEARCH_SYSTEM_PROMPT.to_string(),
            user_prompt: format!("Research this topic for LinkedIn content creation: {}", field),
            temperature: context.config.llm.temperatures.research,
            log_tag: "research".to_string(),
        };
        let react_config = ReActConfig {
            verbose: context.config.verbose,
            ..ReActConfig::with_max_iterations(context.config.research.max_iterations)
        };

        let response = context
            .tool_model
            .complete_with_tools(request, session, &react_config)
            .await
            .map_err(|e| PipelineError::tool_selection(e.to_string()))?;

        if response.stopped_by_max_depth {
            tracing::warn!(
                tool_calls = ?response.tool_calls_history,
                "调研达到最大迭代次数 {}，已调用 {} 次工具，使用已获得的部分结果",
                response.iterations_used,
                response.tool_calls_history.len()
            );
        }
        Ok(response.content)
    }
}

/// 基于查询关键词的确定性决策表
pub struct KeywordHeuristicPolicy;

const RECENCY_WORDS: &[&str] = &[
    "latest", "recent", "news", "breaking", "today", "this week", "announced", "update",
];
const BACKGROUND_WORDS: &[&str] = &[
    "what is", "who is", "who was", "definition", "define", "history", "origin", "meaning",
    "biography",
];
const VIDEO_WORDS: &[&str] = &["video", "tutorial", "youtube", "watch", "demo", "review"];

impl KeywordHeuristicPolicy {
    /// 按新闻、百科、视频的顺序匹配，都不命中时使用网页搜索
    pub fn choose(query: &str) -> ToolKind {
        let query = query.to_lowercase();
        let hits = |words: &[&str]| words.iter().any(|word| query.contains(word));

        if hits(RECENCY_WORDS) {
            ToolKind::News
        } else if hits(BACKGROUND_WORDS) {
            ToolKind::Encyclopedia
        } else if hits(VIDEO_WORDS) {
            ToolKind::Video
        } else {
            ToolKind::Web
        }
    }
}

#[async_trait]
impl SelectionPolicy for KeywordHeuristicPolicy {
    fn name(&self) -> &'static str {
        "keyword"
    }

    async fn run(
        &self,
        _context: &GeneratorContext,
        field: &str,
        session: &ToolSession,
    ) -> Result<String, PipelineError> {
        invoke_directly(Self::choose(field), field, session).await
    }
}

/// 总是调用同一个适配器
pub struct FixedToolPolicy {
    kind: ToolKind,
}

impl FixedToolPolicy {
    pub fn new(kind: ToolKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }
}

#[async_trait]
impl SelectionPolicy for FixedToolPolicy {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn run(
        &self,
        _context: &GeneratorContext,
        field: &str,
        session: &ToolSession,
    ) -> Result<String, PipelineError> {
        invoke_directly(self.kind, field, session).await
    }
}

async fn invoke_directly(
    kind: ToolKind,
    field: &str,
    session: &ToolSession,
) -> Result<String, PipelineError> {
    tracing::info!("直接调用 {} 检索: {}", kind, field);
    session
        .invoke(kind, field)
        .await
        .map_err(|e| PipelineError::Adapter {
            tool: kind,
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::generator::testing::{ScriptedModel, ScriptedToolModel, context_with, toolbox_with};
    use std::sync::Arc;

    #[test]
    fn test_keyword_decision_table() {
        assert_eq!(KeywordHeuristicPolicy::choose("Latest fintech regulation"), ToolKind::News);
        assert_eq!(KeywordHeuristicPolicy::choose("What is quantum computing"), ToolKind::Encyclopedia);
        assert_eq!(KeywordHeuristicPolicy::choose("History of Nvidia"), ToolKind::Encyclopedia);
        assert_eq!(KeywordHeuristicPolicy::choose("Kubernetes tutorial"), ToolKind::Video);
        assert_eq!(KeywordHeuristicPolicy::choose("Best project management tools"), ToolKind::Web);
    }

    #[test]
    fn test_recency_wins_over_video() {
        assert_eq!(KeywordHeuristicPolicy::choose("latest video editing trends"), ToolKind::News);
    }

    #[test]
    fn test_forced_tool_overrides_policy() {
        let mut config = Config::default();
        config.research.policy = PolicyKind::Keyword;
        config.research.forced_tool = Some(ToolKind::News);
        let context = context_with(
            config,
            Arc::new(ScriptedModel::default()),
            Arc::new(ScriptedToolModel::answering("unused")),
            toolbox_with(&[]),
        );
        assert_eq!(policy_from_config(&context).name(), "fixed");
    }

    #[test]
    fn test_policy_from_config() {
        let mut config = Config::default();
        config.research.policy = PolicyKind::Keyword;
        let context = context_with(
            config,
            Arc::new(ScriptedModel::default()),
            Arc::new(ScriptedToolModel::answering("unused")),
            toolbox_with(&[]),
        );
        assert_eq!(policy_from_config(&context).name(), "keyword");

        let context = context_with(
            Config::default(),
            Arc::new(ScriptedModel::default()),
            Arc::new(ScriptedToolModel::answering("unused")),
            toolbox_with(&[]),
        );
        assert_eq!(policy_from_config(&context).name(), "reasoning");
    }

    #[tokio::test]
    async fn test_fixed_tool_invokes_adapter() {
        let toolbox = toolbox_with(&[ToolKind::News]);
        let context = context_with(
            Config::default(),
            Arc::new(ScriptedModel::default()),
            Arc::new(ScriptedToolModel::answering("unused")),
            toolbox.clone(),
        );
        let session = ToolSession::new(toolbox);

        let output = FixedToolPolicy::new(ToolKind::News)
            .run(&context, "fintech", &session)
            .await
            .unwrap();

        assert_eq!(output, "news result for fintech");
        assert_eq!(session.invocations().await[0].kind, ToolKind::News);
    }

    #[tokio::test]
    async fn test_fixed_tool_without_adapter_is_adapter_error() {
        let toolbox = toolbox_with(&[ToolKind::Web]);
        let context = context_with(
            Config::default(),
            Arc::new(ScriptedModel::default()),
            Arc::new(ScriptedToolModel::answering("unused")),
            toolbox.clone(),
        );
        let session = ToolSession::new(toolbox);

        let error = FixedToolPolicy::new(ToolKind::News)
            .run(&context, "fintech", &session)
            .await
            .unwrap_err();

        assert!(matches!(error, PipelineError::Adapter { tool: ToolKind::News, .. }));
    }

    #[tokio::test]
    async fn test_reasoning_policy_passes_prompt_and_iterations() {
        let mut config = Config::default();
        config.research.max_iterations = 2;
        let tool_model = Arc::new(
            ScriptedToolModel::answering("summary of findings").invoking(ToolKind::Web),
        );
        let toolbox = toolbox_with(&ToolKind::ALL);
        let context = context_with(
            config,
            Arc::new(ScriptedModel::default()),
            tool_model.clone(),
            toolbox.clone(),
        );
        let session = ToolSession::new(toolbox);

        let output = RemoteReasoningPolicy
            .run(&context, "AI in Healthcare", &session)
            .await
            .unwrap();

        assert_eq!(output, "summary of findings");
        let (request, max_iterations) = tool_model.last_call().unwrap();
        assert_eq!(
            request.user_prompt,
            "Research this topic for LinkedIn content creation: AI in Healthcare"
        );
        assert_eq!(request.temperature, 0.3);
        assert_eq!(max_iterations, 2);
    }

    #[tokio::test]
    async fn test_reasoning_policy_keeps_partial_result_at_max_depth() {
        let toolbox = toolbox_with(&ToolKind::ALL);
        let context = context_with(
            Config::default(),
            Arc::new(ScriptedModel::default()),
            Arc::new(
                ScriptedToolModel::answering("partial findings")
                    .invoking(ToolKind::News)
                    .invoking(ToolKind::Web)
                    .stopping_at_max_depth(),
            ),
            toolbox.clone(),
        );
        let session = ToolSession::new(toolbox);

        let output = RemoteReasoningPolicy
            .run(&context, "fintech", &session)
            .await
            .unwrap();

        assert_eq!(output, "partial findings");
        assert_eq!(session.invocations().await.len(), 2);
    }

    #[tokio::test]
    async fn test_reasoning_failure_is_tool_selection_error() {
        let toolbox = toolbox_with(&ToolKind::ALL);
        let context = context_with(
            Config::default(),
            Arc::new(ScriptedModel::default()),
            Arc::new(ScriptedToolModel::failing("quota exceeded")),
            toolbox.clone(),
        );
        let session = ToolSession::new(toolbox);

        let error = RemoteReasoningPolicy
            .run(&context, "fintech", &session)
            .await
            .unwrap_err();

        assert_eq!(error, PipelineError::tool_selection("quota exceeded"));
    }
}
