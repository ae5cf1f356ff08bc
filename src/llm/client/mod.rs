//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::config::{Config, LLMConfig};
use crate::llm::tools::research_tool::{ResearchToolset, ToolSession};
use crate::llm::{CompletionRequest, LanguageModel, ToolCallingModel};

mod providers;
mod react;
mod react_executor;
pub mod utils;

pub use react::{ReActConfig, ReActResponse};

use providers::{AgentSettings, ProviderClient};
use react_executor::ReActExecutor;
use utils::evaluate_befitting_model;

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
    verbose: bool,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: &Config) -> Result<Self> {
        let client = ProviderClient::new(&config.llm)?;
        Ok(Self {
            config: config.llm.clone(),
            client,
            verbose: config.verbose,
        })
    }

    /// 检查模型连接是否正常
    pub async fn check_connection(&self) -> Result<()> {
        tracing::info!("正在检查模型连接 ({})...", self.config.provider);
        let request = CompletionRequest {
            system_prompt: "You are a helpful assistant.".to_string(),
            user_prompt: "Hello".to_string(),
            temperature: 0.0,
            log_tag: "connection-check".to_string(),
        };
        match self.complete(request).await {
            Ok(_) => {
                tracing::info!("模型连接正常");
                Ok(())
            }
            Err(e) => {
                tracing::error!("模型连接失败: {}", e);
                Err(e)
            }
        }
    }

    /// 通用重试逻辑，retry_attempts为1时只调用一次
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_retries = self.config.retry_attempts.max(1);
        let retry_delay_ms = self.config.retry_delay_ms;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tracing::warn!(
                        "调用模型服务出错，重试中 (第 {} / {}次尝试): {}",
                        retries,
                        max_retries,
                        err
                    );
                    tokio::time::sleep(Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }

    /// 为单次调用加上超时限制
    async fn with_timeout<T, Fut>(&self, operation: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let seconds = self.config.timeout_seconds;
        tokio::time::timeout(Duration::from_secs(seconds), operation)
            .await
            .map_err(|_| anyhow!("模型调用超时（{}秒）", seconds))?
    }

    async fn complete_with_model(&self, request: &CompletionRequest, model: &str) -> Result<String> {
        tracing::debug!(tag = %request.log_tag, %model, "调用模型");
        let settings = AgentSettings {
            model,
            system_prompt: &request.system_prompt,
            temperature: request.temperature,
            max_tokens: self.config.max_tokens,
        };
        let agent = self.client.create_agent(&settings)?;

        self.retry_with_backoff(|| async {
            self.with_timeout(agent.prompt(&request.user_prompt)).await
        })
        .await
    }
}

#[async_trait]
impl LanguageModel for LLMClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let (befitting_model, fallover_model) = evaluate_befitting_model(
            &self.config,
            &request.system_prompt,
            &request.user_prompt,
        );
        match self.complete_with_model(&request, &befitting_model).await {
            Ok(text) => Ok(text),
            Err(e) => match fallover_model {
                Some(fallover) => {
                    tracing::warn!(
                        tag = %request.log_tag,
                        "调用模型 {} 失败，尝试使用备选模型 {}: {}",
                        befitting_model,
                        fallover,
                        e
                    );
                    self.complete_with_model(&request, &fallover).await
                }
                None => Err(e),
            },
        }
    }
}

#[async_trait]
impl ToolCallingModel for LLMClient {
    async fn complete_with_tools(
        &self,
        request: CompletionRequest,
        session: &ToolSession,
        react_config: &ReActConfig,
    ) -> Result<ReActResponse> {
        let (model, _) = evaluate_befitting_model(
            &self.config,
            &request.system_prompt,
            &request.user_prompt,
        );
        tracing::debug!(tag = %request.log_tag, %model, "调用模型（带调研工具）");

        let settings = AgentSettings {
            model: &model,
            system_prompt: &request.system_prompt,
            temperature: request.temperature,
            max_tokens: self.config.max_tokens,
        };
        let tools = ResearchToolset::new(session);
        let agent = self.client.create_agent_with_tools(&settings, &tools)?;

        let react_config = ReActConfig {
            verbose: react_config.verbose || self.verbose,
            ..react_config.clone()
        };

        self.retry_with_backoff(|| async {
            self.with_timeout(ReActExecutor::execute(
                &agent,
                &request.user_prompt,
                &react_config,
            ))
            .await
        })
        .await
    }
}
