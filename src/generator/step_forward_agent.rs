use async_trait::async_trait;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::config::StageTemperatures;
use crate::generator::context::GeneratorContext;
use crate::generator::types::{PipelineError, StageKind};
use crate::llm::CompletionRequest;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

/// 阶段输入，键为模板中的占位符名
pub type StageInputs = HashMap<&'static str, String>;

/// Prompt模板配置
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// 系统提示词
    pub system_prompt: String,
    /// 用户提示词模板，`{name}` 为占位符
    pub human_template: String,
}

impl PromptTemplate {
    /// 模板中出现的占位符，按出现顺序
    pub fn placeholders(&self) -> Vec<String> {
        PLACEHOLDER
            .captures_iter(&self.human_template)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// 填充占位符，任何一个缺失都视为错误
    pub fn render(&self, template_name: &str, inputs: &StageInputs) -> Result<String, PipelineError> {
        if let Some(placeholder) = self
            .placeholders()
            .into_iter()
            .find(|name| !inputs.contains_key(name.as_str()))
        {
            return Err(PipelineError::Template {
                template: template_name.to_string(),
                placeholder,
            });
        }

        let rendered = PLACEHOLDER.replace_all(&self.human_template, |caps: &Captures| {
            inputs.get(&caps[1]).cloned().unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}

/// 单阶段Agent：固定的提示词模板加一次模型调用
#[async_trait]
pub trait StepForwardAgent: Send + Sync {
    fn stage(&self) -> StageKind;

    /// Prompt模板配置
    fn prompt_template(&self) -> PromptTemplate;

    /// 该阶段使用的采样温度
    fn temperature(&self, temperatures: &StageTemperatures) -> f64;

    /// 默认实现的execute方法：渲染模板、追加语言指令、调用模型并清理输出
    async fn execute(
        &self,
        context: &GeneratorContext,
        inputs: StageInputs,
    ) -> Result<String, PipelineError> {
        let stage = self.stage();
        let template = self.prompt_template();

        // 根据配置的目标语言添加语言指令
        let language_instruction = context.config.target_language.prompt_instruction();
        let system_prompt = format!("{}\n\n{}", template.system_prompt, language_instruction);
        let user_prompt = template.render(&stage.to_string(), &inputs)?;

        let request = CompletionRequest {
            system_prompt,
            user_prompt,
            temperature: self.temperature(&context.config.llm.temperatures),
            log_tag: stage.to_string(),
        };

        tracing::info!("执行 {} 阶段...", stage);
        let output = context
            .model
            .complete(request)
            .await
            .map_err(|e| PipelineError::stage(stage, e.to_string()))?;

        let output = output.trim();
        if output.is_empty() {
            return Err(PipelineError::stage(stage, "model returned an empty response"));
        }

        tracing::info!("{} 阶段完成", stage);
        Ok(output.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> PromptTemplate {
        PromptTemplate {
            system_prompt: "system".to_string(),
            human_template: "Topic: {topic}\n\nChosen Angle: {angle}".to_string(),
        }
    }

    #[test]
    fn test_placeholders_in_order() {
        assert_eq!(template().placeholders(), vec!["topic", "angle"]);
    }

    #[test]
    fn test_render_fills_all_placeholders() {
        let inputs = StageInputs::from([
            ("topic", "Edge AI".to_string()),
            ("angle", "Contrarian {not a placeholder}".to_string()),
        ]);
        let rendered = template().render("drafting", &inputs).unwrap();

        assert_eq!(
            rendered,
            "Topic: Edge AI\n\nChosen Angle: Contrarian {not a placeholder}"
        );
    }

    #[test]
    fn test_render_reports_missing_placeholder() {
        let inputs = StageInputs::from([("topic", "Edge AI".to_string())]);
        let error = template().render("drafting", &inputs).unwrap_err();

        assert_eq!(
            error,
            PipelineError::Template {
                template: "drafting".to_string(),
                placeholder: "angle".to_string(),
            }
        );
    }

    #[test]
    fn test_render_reports_first_missing_in_template_order() {
        let error = template().render("drafting", &StageInputs::new()).unwrap_err();
        assert!(matches!(
            error,
            PipelineError::Template { placeholder, .. } if placeholder == "topic"
        ));
    }
}
