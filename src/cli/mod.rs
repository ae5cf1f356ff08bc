use crate::config::{Config, DEFAULT_CONFIG_FILE, LLMProvider, PolicyKind};
use crate::generator::workflow::WorkflowRequest;
use crate::i18n::TargetLanguage;
use crate::search::ToolKind;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Content Strategist - 由LLM驱动的LinkedIn内容调研与创作流水线
#[derive(Parser, Debug)]
#[command(name = "content-strategist")]
#[command(
    about = "Research a professional field with news, web, video and encyclopedia search, pick a LinkedIn topic, and turn it into a polished post."
)]
#[command(version)]
pub struct Args {
    /// 调研的领域或话题，例如 "AI in Healthcare"
    #[arg(short, long, required_unless_present = "topic")]
    pub field: Option<String>,

    /// 选取第几个候选话题进行创作（从1开始）
    #[arg(long, default_value_t = 1)]
    pub pick: usize,

    /// 分析完成后继续创作帖子
    #[arg(long)]
    pub create: bool,

    /// 直接指定创作话题，跳过调研与分析
    #[arg(long, conflicts_with = "field")]
    pub topic: Option<String>,

    /// 指定写作角度，为空时使用生成的第一个角度
    #[arg(long)]
    pub angle: Option<String>,

    /// 工具选择策略 (reasoning, keyword)
    #[arg(long)]
    pub policy: Option<PolicyKind>,

    /// 固定使用某个检索工具 (news, web, video, encyclopedia)
    #[arg(long)]
    pub tool: Option<ToolKind>,

    /// 会话与帖子的输出目录
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 高能效模型，用于常规推理任务
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，作为efficient失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// LLM Provider (gemini, openai, mistral, openrouter, anthropic, deepseek, moonshot, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// 目标语言 (en, zh, ja, de, fr, es)
    #[arg(long)]
    pub target_language: Option<String>,
}

impl Args {
    /// 本次运行的工作流请求
    pub fn workflow_request(&self) -> WorkflowRequest {
        WorkflowRequest {
            field: self.field.clone(),
            pick: self.pick,
            create: self.create,
            topic: self.topic.clone(),
            angle: self.angle.clone().unwrap_or_default(),
        }
    }

    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            // 显式指定的配置文件必须可读
            Some(config_path) => Config::from_file(config_path)?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);

                if default_config_path.exists() {
                    Config::from_file(&default_config_path).context(format!(
                        "Failed to load default config file {:?}",
                        default_config_path
                    ))?
                } else {
                    Config::default()
                }
            }
        };

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            match provider_str.parse::<LLMProvider>() {
                Ok(provider) => config.llm.provider = provider,
                Err(_) => tracing::warn!(
                    "⚠️ 未知的provider: {}，使用 {}",
                    provider_str,
                    config.llm.provider
                ),
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        } else if config.llm.api_key.trim().is_empty() {
            // 未显式传入时读取当前Provider对应的环境变量
            if let Some(key) = config
                .llm
                .provider
                .api_key_env()
                .and_then(|name| std::env::var(name).ok())
            {
                config.llm.api_key = key;
            }
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }

        // 目标语言配置
        if let Some(target_language_str) = self.target_language {
            match target_language_str.parse::<TargetLanguage>() {
                Ok(target_language) => config.target_language = target_language,
                Err(_) => tracing::warn!(
                    "⚠️ 未知的目标语言: {}，使用 {}",
                    target_language_str,
                    config.target_language.display_name()
                ),
            }
        }

        // 调研配置
        if let Some(policy) = self.policy {
            config.research.policy = policy;
        }
        if let Some(tool) = self.tool {
            config.research.forced_tool = Some(tool);
        }

        if let Some(output) = self.output {
            config.output_path = Some(output);
        }
        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }
}
