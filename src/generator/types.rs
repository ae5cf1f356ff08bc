//! 流水线在各阶段之间传递的记录

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

use crate::generator::research::topics::parse_topics;
use crate::search::ToolKind;

/// 基于模型的文本变换阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    TopicAnalysis,
    Angles,
    Drafting,
    Critique,
    Formatting,
}

impl StageKind {
    /// 该阶段失败时错误文本的前缀
    pub fn error_prefix(&self) -> &'static str {
        match self {
            StageKind::TopicAnalysis => "Error during topic analysis",
            StageKind::Angles => "Error generating angles",
            StageKind::Drafting => "Error drafting post",
            StageKind::Critique => "Error during critique",
            StageKind::Formatting => "Error formatting final post",
        }
    }
}

impl Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            StageKind::TopicAnalysis => "topic_analysis",
            StageKind::Angles => "angle_generation",
            StageKind::Drafting => "drafting",
            StageKind::Critique => "critique",
            StageKind::Formatting => "formatting",
        };
        write!(f, "{}", str)
    }
}

/// 流水线错误，所有变体的文本都包含 `Error`
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineError {
    #[error("Error from {tool} adapter: {message}")]
    Adapter { tool: ToolKind, message: String },

    #[error("Error during research: {message}")]
    ToolSelection { message: String },

    #[error("{}: {}", .stage.error_prefix(), .message)]
    Stage { stage: StageKind, message: String },

    #[error("Error parsing {target}: {message}")]
    Parsing { target: String, message: String },

    #[error("Error rendering {template} prompt: missing value for {{{placeholder}}}")]
    Template {
        template: String,
        placeholder: String,
    },
}

impl PipelineError {
    pub fn stage(stage: StageKind, message: impl Into<String>) -> Self {
        PipelineError::Stage {
            stage,
            message: message.into(),
        }
    }

    pub fn tool_selection(message: impl Into<String>) -> Self {
        PipelineError::ToolSelection {
            message: message.into(),
        }
    }

    /// 不带前缀的原始错误信息
    pub fn message(&self) -> String {
        match self {
            PipelineError::Adapter { message, .. }
            | PipelineError::ToolSelection { message }
            | PipelineError::Stage { message, .. }
            | PipelineError::Parsing { message, .. } => message.clone(),
            PipelineError::Template { .. } => self.to_string(),
        }
    }
}

/// 调研结果，生成后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub field: String,
    pub research_data: String,
    pub tool_used: ToolKind,
    pub reasoning: String,
}

impl ResearchResult {
    /// 调研失败时对外呈现的结果
    pub fn failed(field: &str, error: &PipelineError) -> Self {
        Self {
            field: field.to_string(),
            research_data: format!("Error during research: {}", error.message()),
            tool_used: ToolKind::None,
            reasoning: format!("Failed to complete research: {}", error.message()),
        }
    }
}

/// 候选话题
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    /// Why it matters
    pub rationale: String,
    /// Key angle，缺失时为空
    pub angle_hint: String,
}

/// 分析链的输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub field: String,
    pub research_data: String,
    pub tool_used: ToolKind,
    pub reasoning: String,
    /// 话题分析的原始文本
    pub topics: String,
    pub failure: Option<PipelineError>,
}

impl AnalysisResult {
    pub fn succeeded(research: ResearchResult, topics: String) -> Self {
        Self {
            field: research.field,
            research_data: research.research_data,
            tool_used: research.tool_used,
            reasoning: research.reasoning,
            topics,
            failure: None,
        }
    }

    /// 调研失败：三个文本字段都携带错误信息
    pub fn research_failed(field: &str, error: PipelineError) -> Self {
        let research = ResearchResult::failed(field, &error);
        Self {
            field: research.field,
            research_data: research.research_data,
            tool_used: ToolKind::None,
            reasoning: research.reasoning,
            topics: format!("{}: {}", StageKind::TopicAnalysis.error_prefix(), error.message()),
            failure: Some(error),
        }
    }

    /// 话题分析失败：保留调研输出
    pub fn analysis_failed(research: ResearchResult, error: PipelineError) -> Self {
        Self {
            field: research.field,
            research_data: research.research_data,
            tool_used: research.tool_used,
            reasoning: research.reasoning,
            topics: error.to_string(),
            failure: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn parsed_topics(&self) -> Vec<Topic> {
        if self.failure.is_some() {
            return Vec::new();
        }
        parse_topics(&self.topics)
    }

    /// 按1起始的序号取话题
    pub fn topic(&self, number: usize) -> Result<Topic, PipelineError> {
        let topics = self.parsed_topics();
        if topics.is_empty() {
            return Err(PipelineError::Parsing {
                target: "topics".to_string(),
                message: "no topics found in the analysis output".to_string(),
            });
        }
        number
            .checked_sub(1)
            .and_then(|index| topics.get(index).cloned())
            .ok_or_else(|| PipelineError::Parsing {
                target: "topics".to_string(),
                message: format!(
                    "topic {} requested but only {} topics were found",
                    number,
                    topics.len()
                ),
            })
    }
}

/// 创作链的输出，逐阶段填充
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreationResult {
    pub topic: String,
    pub angles: String,
    pub selected_angle: String,
    pub draft: String,
    pub critique: String,
    pub final_post: String,
    pub failure: Option<PipelineError>,
}

impl CreationResult {
    pub fn new(topic: &str, selected_angle: &str) -> Self {
        Self {
            topic: topic.to_string(),
            selected_angle: selected_angle.to_string(),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// 记录失败：尚未产出的字段统一填入同一段错误文本
    pub fn record_failure(&mut self, error: PipelineError) {
        let text = error.to_string();
        for field in [
            &mut self.angles,
            &mut self.selected_angle,
            &mut self.draft,
            &mut self.critique,
            &mut self.final_post,
        ] {
            if field.trim().is_empty() {
                *field = text.clone();
            }
        }
        self.failure = Some(error);
    }
}
