use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::llm::{LLMClient, LanguageModel, ToolCallingModel};
use crate::search::SearchToolbox;

/// 各阶段共享的只读依赖
#[derive(Clone)]
pub struct GeneratorContext {
    /// 配置
    pub config: Config,
    /// 单轮文本补全，供话题分析与创作各阶段使用
    pub model: Arc<dyn LanguageModel>,
    /// 带工具的多轮推理，供调研阶段使用
    pub tool_model: Arc<dyn ToolCallingModel>,
    /// 检索适配器
    pub toolbox: SearchToolbox,
}

impl GeneratorContext {
    /// 根据配置创建LLM客户端与检索适配器
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(&config)?;
        Self::from_client(config, llm_client)
    }

    /// 复用已创建的LLM客户端
    pub fn from_client(config: Config, llm_client: LLMClient) -> Result<Self> {
        let toolbox =
            SearchToolbox::from_config(&config.search).context("Failed to build search adapters")?;
        let llm_client = Arc::new(llm_client);
        Ok(Self {
            config,
            model: llm_client.clone(),
            tool_model: llm_client,
            toolbox,
        })
    }

    /// 显式指定模型与适配器
    pub fn with_models(
        config: Config,
        model: Arc<dyn LanguageModel>,
        tool_model: Arc<dyn ToolCallingModel>,
        toolbox: SearchToolbox,
    ) -> Self {
        Self {
            config,
            model,
            tool_model,
            toolbox,
        }
    }
}
