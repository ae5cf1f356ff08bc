use crate::generator::context::GeneratorContext;
use crate::generator::research::ResearchSelector;
use crate::generator::research::agents::topic_analyst::TopicAnalyst;
use crate::generator::step_forward_agent::{StageInputs, StepForwardAgent};
use crate::generator::types::AnalysisResult;
use crate::session::{LogStatus, WorkflowSession, WorkflowStep};

/// 分析链：调研 -> 话题分析
pub struct AnalysisChain {
    context: GeneratorContext,
    selector: ResearchSelector,
}

impl AnalysisChain {
    pub fn new(context: GeneratorContext) -> Self {
        let selector = ResearchSelector::new(context.clone());
        Self { context, selector }
    }

    pub fn with_selector(context: GeneratorContext, selector: ResearchSelector) -> Self {
        Self { context, selector }
    }

    /// 使用临时会话执行
    pub async fn invoke(&self, field: &str) -> AnalysisResult {
        let mut session = WorkflowSession::new();
        self.invoke_in_session(&mut session, field).await
    }

    /// 执行分析链，日志与结果写入会话
    pub async fn invoke_in_session(
        &self,
        session: &mut WorkflowSession,
        field: &str,
    ) -> AnalysisResult {
        session.log(
            WorkflowStep::RESEARCH,
            "Looking for recent news...",
            LogStatus::Info,
        );

        let result = match self.selector.research(field).await {
            Err(e) => {
                session.log(
                    WorkflowStep::ERROR,
                    format!("Failed to analyze topics: {}", e),
                    LogStatus::Error,
                );
                AnalysisResult::research_failed(field, e)
            }
            Ok(research) => {
                session.log(
                    WorkflowStep::RESEARCH,
                    format!("Research completed with {}", research.tool_used),
                    LogStatus::Success,
                );

                let inputs = StageInputs::from([("research_data", research.research_data.clone())]);
                match TopicAnalyst.execute(&self.context, inputs).await {
                    Ok(topics) => {
                        session.log(
                            WorkflowStep::ANALYSIS,
                            "Found some good topics",
                            LogStatus::Success,
                        );
                        AnalysisResult::succeeded(research, topics)
                    }
                    Err(e) => {
                        session.log(
                            WorkflowStep::ERROR,
                            format!("Failed to analyze topics: {}", e),
                            LogStatus::Error,
                        );
                        AnalysisResult::analysis_failed(research, e)
                    }
                }
            }
        };

        session.record_analysis(result.clone());
        result
    }
}
