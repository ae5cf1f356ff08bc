use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::i18n::TargetLanguage;
use crate::search::ToolKind;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "strategist.toml";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    #[default]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Mistral => write!(f, "mistral"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl LLMProvider {
    /// 该Provider的API KEY对应的环境变量，本地Ollama不需要
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            LLMProvider::OpenAI => Some("OPENAI_API_KEY"),
            LLMProvider::Moonshot => Some("MOONSHOT_API_KEY"),
            LLMProvider::DeepSeek => Some("DEEPSEEK_API_KEY"),
            LLMProvider::Mistral => Some("MISTRAL_API_KEY"),
            LLMProvider::OpenRouter => Some("OPENROUTER_API_KEY"),
            LLMProvider::Anthropic => Some("ANTHROPIC_API_KEY"),
            LLMProvider::Gemini => Some("GOOGLE_API_KEY"),
            LLMProvider::Ollama => None,
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "mistral" => Ok(LLMProvider::Mistral),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 调研工具选择策略
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    /// 交给模型推理选择工具
    #[serde(rename = "reasoning")]
    #[default]
    Reasoning,
    /// 基于查询关键词的确定性决策表
    #[serde(rename = "keyword")]
    Keyword,
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reasoning" | "llm" => Ok(PolicyKind::Reasoning),
            "keyword" | "heuristic" => Ok(PolicyKind::Keyword),
            _ => Err(format!("Unknown selection policy: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 各搜索适配器配置
    pub search: SearchConfig,

    /// 调研阶段配置
    pub research: ResearchConfig,

    /// 帖子输出语言
    pub target_language: TargetLanguage,

    /// 会话与帖子的输出目录，为空时只打印到终端
    pub output_path: Option<PathBuf>,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 常规模型，用于绝大多数阶段
    pub model_efficient: String,

    /// 长上下文模型，提示词超过阈值时使用
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 调用次数（1表示不重试）
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 单次调用超时时间（秒）
    pub timeout_seconds: u64,

    /// 各阶段温度
    pub temperatures: StageTemperatures,
}

/// 各阶段的采样温度
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StageTemperatures {
    pub research: f64,
    pub topic_analysis: f64,
    pub angles: f64,
    pub drafting: f64,
    pub critique: f64,
    pub formatting: f64,
}

/// 单个搜索适配器配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AdapterConfig {
    /// 服务基地址
    pub base_url: String,

    /// API KEY，不需要鉴权的服务留空
    #[serde(default)]
    pub api_key: String,

    /// 返回条目上限
    pub max_results: usize,

    /// HTTP超时（秒），为空时使用reqwest默认行为
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// 搜索适配器配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub gnews: AdapterConfig,
    pub tavily: AdapterConfig,
    pub youtube: AdapterConfig,
    pub wikipedia: AdapterConfig,
}

/// 调研阶段配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    /// 工具选择策略
    pub policy: PolicyKind,

    /// 强制使用的工具，设置后忽略policy
    pub forced_tool: Option<ToolKind>,

    /// 推理循环的最大迭代次数
    pub max_iterations: usize,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 列出缺失的凭据，返回对应的环境变量名
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.llm.api_key.trim().is_empty() {
            missing.extend(self.llm.provider.api_key_env());
        }
        if self.search.gnews.api_key.trim().is_empty() {
            missing.push("GNEWS_API_KEY");
        }
        if self.search.tavily.api_key.trim().is_empty() {
            missing.push("TAVILY_API_KEY");
        }
        missing
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: LLMProvider::default()
                .api_key_env()
                .and_then(|name| std::env::var(name).ok())
                .unwrap_or_default(),
            api_base_url: String::from("https://generativelanguage.googleapis.com"),
            model_efficient: String::from("gemini-2.5-flash"),
            model_powerful: String::from("gemini-2.5-pro"),
            max_tokens: 8192,
            retry_attempts: 1,
            retry_delay_ms: 2000,
            timeout_seconds: 120,
            temperatures: StageTemperatures::default(),
        }
    }
}

impl Default for StageTemperatures {
    fn default() -> Self {
        Self {
            research: 0.3,
            topic_analysis: 0.4,
            angles: 0.6,
            drafting: 0.5,
            critique: 0.3,
            formatting: 0.2,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            gnews: AdapterConfig {
                base_url: String::from("https://gnews.io"),
                api_key: std::env::var("GNEWS_API_KEY").unwrap_or_default(),
                max_results: 5,
                timeout_seconds: Some(10),
            },
            tavily: AdapterConfig {
                base_url: String::from("https://api.tavily.com"),
                api_key: std::env::var("TAVILY_API_KEY").unwrap_or_default(),
                max_results: 5,
                timeout_seconds: None,
            },
            youtube: AdapterConfig {
                base_url: String::from("https://www.youtube.com"),
                api_key: String::new(),
                max_results: 5,
                timeout_seconds: None,
            },
            wikipedia: AdapterConfig {
                base_url: String::from("https://en.wikipedia.org"),
                api_key: String::new(),
                max_results: 3,
                timeout_seconds: None,
            },
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            forced_tool: None,
            max_iterations: 3,
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
