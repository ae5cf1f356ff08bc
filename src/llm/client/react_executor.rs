//! ReAct执行器 - 负责执行ReAct模式的多轮对话逻辑

use anyhow::Result;
use rig::completion::{AssistantContent, Message, PromptError};

use super::providers::ProviderAgent;
use super::react::{ReActConfig, ReActResponse};

const INTERRUPTED_FALLBACK: &str =
    "Research was interrupted before the assistant produced a complete answer.";

/// ReAct执行器
pub struct ReActExecutor;

impl ReActExecutor {
    /// 执行ReAct循环逻辑
    pub async fn execute(
        agent: &ProviderAgent,
        user_prompt: &str,
        config: &ReActConfig,
    ) -> Result<ReActResponse> {
        if config.verbose {
            tracing::info!("激活ReAct Agent模式，最大迭代次数: {}", config.max_iterations);
        }

        match agent.multi_turn(user_prompt, config.max_iterations).await {
            Ok(response) => {
                tracing::debug!("ReAct Agent任务完成");
                Ok(ReActResponse::success(response, config.max_iterations))
            }
            Err(PromptError::MaxDepthError {
                max_depth,
                chat_history,
                prompt: _,
            }) => {
                tracing::warn!("达到最大迭代次数 ({}), 触发中断", max_depth);

                if config.return_partial_on_max_depth {
                    let (content, tool_calls) = Self::extract_partial_result(&chat_history);
                    Ok(ReActResponse::max_depth_reached(
                        annotate_interrupted(&content, max_depth),
                        max_depth,
                        tool_calls,
                    ))
                } else {
                    Err(anyhow::anyhow!(
                        "ReAct Agent因达到最大迭代次数({})而未完成任务",
                        max_depth
                    ))
                }
            }
            Err(e) => {
                tracing::debug!("ReAct Agent出错: {:?}", e);
                Err(anyhow::anyhow!("ReAct Agent任务执行失败: {}", e))
            }
        }
    }

    /// 从聊天历史中提取部分结果
    ///
    /// 工具返回的文本也算作部分结果：最后一条助手文本缺失时，用最近一次工具输出代替。
    fn extract_partial_result(chat_history: &[Message]) -> (String, Vec<String>) {
        let mut tool_calls = Vec::new();
        for msg in chat_history {
            if let Message::Assistant { content, .. } = msg {
                for c in content.iter() {
                    if let AssistantContent::ToolCall(tool_call) = c {
                        tool_calls.push(format!(
                            "{}({})",
                            tool_call.function.name, tool_call.function.arguments
                        ));
                    }
                }
            }
        }

        let last_assistant_text = chat_history.iter().rev().find_map(|msg| match msg {
            Message::Assistant { content, .. } => {
                let text = content
                    .iter()
                    .filter_map(|c| match c {
                        AssistantContent::Text(text) => Some(text.text.clone()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                (!text.trim().is_empty()).then_some(text)
            }
            _ => None,
        });

        let content = last_assistant_text
            .or_else(|| last_tool_output(chat_history))
            .unwrap_or_else(|| INTERRUPTED_FALLBACK.to_string());

        (content, tool_calls)
    }
}

fn last_tool_output(chat_history: &[Message]) -> Option<String> {
    use rig::completion::message::{ToolResultContent, UserContent};

    chat_history.iter().rev().find_map(|msg| match msg {
        Message::User { content, .. } => content.iter().find_map(|c| match c {
            UserContent::ToolResult(result) => {
                let text = result
                    .content
                    .iter()
                    .filter_map(|part| match part {
                        ToolResultContent::Text(text) => Some(text.text.clone()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                (!text.trim().is_empty()).then_some(text)
            }
            _ => None,
        }),
        _ => None,
    })
}

/// 给部分结果加上中断说明
pub(crate) fn annotate_interrupted(content: &str, max_depth: usize) -> String {
    format!(
        "{}\n\n[Interrupted: reached the maximum of {} reasoning iterations]",
        content, max_depth
    )
}
