use crate::generator::compose::agents::angle_generator::AngleGenerator;
use crate::generator::compose::agents::critic::Critic;
use crate::generator::compose::agents::drafter::Drafter;
use crate::generator::compose::agents::formatter::Formatter;
use crate::generator::compose::angles::first_angle;
use crate::generator::context::GeneratorContext;
use crate::generator::step_forward_agent::{StageInputs, StepForwardAgent};
use crate::generator::types::{CreationResult, PipelineError};
use crate::session::{LogStatus, WorkflowSession, WorkflowStep};

pub mod agents;
pub mod angles;

/// 创作链：角度 -> 初稿 -> 审稿 -> 定稿
pub struct CreationChain {
    context: GeneratorContext,
}

impl CreationChain {
    pub fn new(context: GeneratorContext) -> Self {
        Self { context }
    }

    /// 使用临时会话执行
    pub async fn invoke(&self, topic: &str, angle: &str) -> CreationResult {
        let mut session = WorkflowSession::new();
        self.invoke_in_session(&mut session, topic, angle).await
    }

    /// 依次执行四个阶段，第一个失败的阶段之后不再继续
    pub async fn invoke_in_session(
        &self,
        session: &mut WorkflowSession,
        topic: &str,
        angle: &str,
    ) -> CreationResult {
        session.log(WorkflowStep::WRITING, "Creating your post...", LogStatus::Info);

        let mut result = CreationResult::new(topic, angle);
        match self.run_stages(session, &mut result).await {
            Ok(()) => session.log(WorkflowStep::DONE, "Post is ready!", LogStatus::Success),
            Err(e) => {
                session.log(
                    WorkflowStep::ERROR,
                    format!("Failed to generate post: {}", e),
                    LogStatus::Error,
                );
                result.record_failure(e);
            }
        }

        session.record_creation(result.clone());
        result
    }

    async fn run_stages(
        &self,
        session: &mut WorkflowSession,
        result: &mut CreationResult,
    ) -> Result<(), PipelineError> {
        let inputs = StageInputs::from([("topic", result.topic.clone())]);
        result.angles = AngleGenerator.execute(&self.context, inputs).await?;
        session.log(WorkflowStep::WRITING, "Generated angles", LogStatus::Info);

        if result.selected_angle.trim().is_empty() {
            result.selected_angle = first_angle(&result.angles);
        }

        let inputs = StageInputs::from([
            ("topic", result.topic.clone()),
            ("angle", result.selected_angle.clone()),
        ]);
        result.draft = Drafter.execute(&self.context, inputs).await?;
        session.log(WorkflowStep::WRITING, "Drafted post", LogStatus::Info);

        let inputs = StageInputs::from([("draft", result.draft.clone())]);
        result.critique = Critic.execute(&self.context, inputs).await?;
        session.log(WorkflowStep::WRITING, "Reviewed draft", LogStatus::Info);

        let inputs = StageInputs::from([
            ("draft", result.draft.clone()),
            ("critique", result.critique.clone()),
        ]);
        result.final_post = Formatter.execute(&self.context, inputs).await?;

        Ok(())
    }
}
