use crate::config::LLMConfig;

/// 提示词长度阈值，超过后改用长上下文模型
const EFFICIENT_PROMPT_LIMIT: usize = 32 * 1024;

/// 按提示词长度选择模型，返回 (首选模型, 失败后的备选模型)
pub fn evaluate_befitting_model(
    llm_config: &LLMConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> (String, Option<String>) {
    if system_prompt.len() + user_prompt.len() <= EFFICIENT_PROMPT_LIMIT {
        let fallover = (llm_config.model_powerful != llm_config.model_efficient)
            .then(|| llm_config.model_powerful.clone());
        return (llm_config.model_efficient.clone(), fallover);
    }
    (llm_config.model_powerful.clone(), None)
}
