//! 模型调用层，流水线只依赖这里定义的两个trait，便于在测试中替换为桩模型

use anyhow::Result;
use async_trait::async_trait;

pub mod client;
pub mod tools;

pub use client::{LLMClient, ReActConfig, ReActResponse};
pub use tools::research_tool::{ToolInvocation, ToolSession};

/// 一次补全请求
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f64,
    /// 日志中标识调用方
    pub log_tag: String,
}

/// 纯文本补全
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

/// 可调用调研工具的多轮推理
///
/// 实现方必须通过 `session` 调用工具，调用记录用于判定实际使用的工具。
#[async_trait]
pub trait ToolCallingModel: Send + Sync {
    async fn complete_with_tools(
        &self,
        request: CompletionRequest,
        session: &ToolSession,
        react_config: &ReActConfig,
    ) -> Result<ReActResponse>;
}
