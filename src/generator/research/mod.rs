// 调研与话题分析
// ResearchSelector：按SelectionPolicy调用检索工具，记录实际使用的工具与理由
// TopicAnalyst：从调研材料中提炼2-3个LinkedIn话题，parse_topics负责解析
// AnalysisChain：调研 -> 话题分析，任一步失败即中止

use crate::generator::context::GeneratorContext;
use crate::generator::research::policy::{SelectionPolicy, policy_from_config};
use crate::generator::types::{PipelineError, ResearchResult};
use crate::llm::ToolSession;
use crate::search::ToolKind;

pub mod agents;
pub mod orchestrator;
pub mod policy;
pub mod topics;

pub use orchestrator::AnalysisChain;

/// 调研选择器
pub struct ResearchSelector {
    context: GeneratorContext,
    policy: Box<dyn SelectionPolicy>,
}

impl ResearchSelector {
    /// 按配置选择策略
    pub fn new(context: GeneratorContext) -> Self {
        let policy = policy_from_config(&context);
        Self { context, policy }
    }

    pub fn with_policy(context: GeneratorContext, policy: Box<dyn SelectionPolicy>) -> Self {
        Self { context, policy }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// 执行一次调研，每次调用使用全新的工具会话
    pub async fn research(&self, field: &str) -> Result<ResearchResult, PipelineError> {
        let session = ToolSession::new(self.context.toolbox.clone());
        tracing::info!("🔎 开始调研 [{}策略]: {}", self.policy.name(), field);

        let research_data = self.policy.run(&self.context, field, &session).await?;

        let invocations = session.invocations().await;
        if invocations.len() > 1 {
            tracing::debug!(
                "共调用 {} 次工具，以第一次为准: {:?}",
                invocations.len(),
                invocations
                    .iter()
                    .map(|invocation| invocation.kind.tool_name())
                    .collect::<Vec<_>>()
            );
        }

        let (tool_used, reasoning) = match invocations.first() {
            Some(invocation) => (invocation.kind, invocation.kind.selection_reasoning(field)),
            None => detect_tool_from_output(&research_data, field),
        };
        tracing::info!("✓ 调研完成，使用工具: {}", tool_used);

        Ok(ResearchResult {
            field: field.to_string(),
            research_data,
            tool_used,
            reasoning,
        })
    }

    /// 失败时返回携带错误文本的结果而不是错误
    pub async fn research_or_report(&self, field: &str) -> ResearchResult {
        match self.research(field).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("调研失败: {}", e);
                ResearchResult::failed(field, &e)
            }
        }
    }
}

/// 没有工具调用记录时，根据输出内容推断工具，仅用于展示
fn detect_tool_from_output(output: &str, field: &str) -> (ToolKind, String) {
    let output = output.to_lowercase();
    if output.contains("article") && output.contains("news") {
        (ToolKind::News, format!("Detected news content for: {}", field))
    } else if output.contains("wikipedia") || output.contains("definition") {
        (
            ToolKind::Encyclopedia,
            format!("Detected encyclopedia content for: {}", field),
        )
    } else if output.contains("video") || output.contains("youtube") {
        (ToolKind::Video, format!("Detected video content for: {}", field))
    } else {
        (ToolKind::Web, format!("Used web search for: {}", field))
    }
}
