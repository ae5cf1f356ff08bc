//! 工作流会话 - 显式传递的上下文，记录工作流日志与各条链的结果

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

use crate::generator::types::{AnalysisResult, CreationResult, Topic};

/// 日志条目状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Info,
    Success,
    Error,
}

impl Display for LogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            LogStatus::Info => "info",
            LogStatus::Success => "success",
            LogStatus::Error => "error",
        };
        write!(f, "{}", str)
    }
}

/// 工作流步骤名
pub struct WorkflowStep;

impl WorkflowStep {
    pub const SETUP: &'static str = "Setup";
    pub const RESEARCH: &'static str = "Research";
    pub const ANALYSIS: &'static str = "Analysis";
    pub const WRITING: &'static str = "Writing";
    pub const DONE: &'static str = "Done";
    pub const ERROR: &'static str = "Error";
}

/// 工作流日志条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub step: String,
    pub message: String,
    pub status: LogStatus,
    pub timestamp: DateTime<Utc>,
}

/// 一次从调研到成稿的完整会话
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub log: Vec<LogEntry>,
    pub analysis: Option<AnalysisResult>,
    pub selected_topic: Option<Topic>,
    pub creation: Option<CreationResult>,
}

impl Default for WorkflowSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_updated: now,
            log: Vec::new(),
            analysis: None,
            selected_topic: None,
            creation: None,
        }
    }

    /// 追加日志条目，同时输出到tracing
    pub fn log(&mut self, step: &str, message: impl Into<String>, status: LogStatus) {
        let message = message.into();
        match status {
            LogStatus::Info => tracing::info!(session = %self.id, step, "{}", message),
            LogStatus::Success => tracing::info!(session = %self.id, step, "✓ {}", message),
            LogStatus::Error => tracing::error!(session = %self.id, step, "{}", message),
        }

        let timestamp = Utc::now();
        self.log.push(LogEntry {
            step: step.to_string(),
            message,
            status,
            timestamp,
        });
        self.last_updated = timestamp;
    }

    pub fn record_analysis(&mut self, result: AnalysisResult) {
        self.analysis = Some(result);
        self.last_updated = Utc::now();
    }

    pub fn select_topic(&mut self, topic: Topic) {
        self.selected_topic = Some(topic);
        self.last_updated = Utc::now();
    }

    pub fn record_creation(&mut self, result: CreationResult) {
        self.creation = Some(result);
        self.last_updated = Utc::now();
    }

    /// 清空结果与日志，开始新一轮创作
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn has_errors(&self) -> bool {
        self.log.iter().any(|entry| entry.status == LogStatus::Error)
    }

    pub fn entries_for(&self, step: &str) -> Vec<&LogEntry> {
        self.log.iter().filter(|entry| entry.step == step).collect()
    }

    /// 已完成的成稿
    pub fn final_post(&self) -> Option<&str> {
        self.creation
            .as_ref()
            .filter(|creation| creation.is_success())
            .map(|creation| creation.final_post.as_str())
    }
}
