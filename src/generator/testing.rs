//! 测试用的桩模型与桩适配器

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::generator::context::GeneratorContext;
use crate::llm::{
    CompletionRequest, LanguageModel, ReActConfig, ReActResponse, ToolCallingModel, ToolSession,
};
use crate::search::{SearchAdapter, SearchError, SearchOutcome, SearchToolbox, ToolKind};

/// 按 `log_tag` 返回预设文本的补全模型
#[derive(Default)]
pub struct ScriptedModel {
    replies: HashMap<String, String>,
    failures: HashMap<String, String>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn reply(mut self, tag: &str, text: &str) -> Self {
        self.replies.insert(tag.to_string(), text.to_string());
        self
    }

    pub fn fail(mut self, tag: &str, message: &str) -> Self {
        self.failures.insert(tag.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_tags(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.log_tag).collect()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let tag = request.log_tag.clone();
        self.calls.lock().unwrap().push(request);
        if let Some(message) = self.failures.get(&tag) {
            return Err(anyhow!(message.clone()));
        }
        Ok(self
            .replies
            .get(&tag)
            .cloned()
            .unwrap_or_else(|| format!("{} output", tag)))
    }
}

/// 依次调用预设工具后返回固定文本的推理模型
pub struct ScriptedToolModel {
    content: String,
    invoke: Vec<ToolKind>,
    failure: Option<String>,
    max_depth: bool,
    calls: Mutex<Vec<(CompletionRequest, usize)>>,
}

impl ScriptedToolModel {
    pub fn answering(content: &str) -> Self {
        Self {
            content: content.to_string(),
            invoke: Vec::new(),
            failure: None,
            max_depth: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::answering("")
        }
    }

    pub fn invoking(mut self, kind: ToolKind) -> Self {
        self.invoke.push(kind);
        self
    }

    /// 调用完预设工具后按达到迭代上限返回
    pub fn stopping_at_max_depth(mut self) -> Self {
        self.max_depth = true;
        self
    }

    pub fn last_call(&self) -> Option<(CompletionRequest, usize)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ToolCallingModel for ScriptedToolModel {
    async fn complete_with_tools(
        &self,
        request: CompletionRequest,
        session: &ToolSession,
        react_config: &ReActConfig,
    ) -> Result<ReActResponse> {
        let query = request.user_prompt.clone();
        self.calls
            .lock()
            .unwrap()
            .push((request, react_config.max_iterations));

        if let Some(message) = &self.failure {
            return Err(anyhow!(message.clone()));
        }
        let mut history = Vec::new();
        for kind in &self.invoke {
            session.invoke(*kind, &query).await?;
            history.push(format!("{}({})", kind.tool_name(), query));
        }
        if self.max_depth {
            return Ok(ReActResponse::max_depth_reached(
                self.content.clone(),
                react_config.max_iterations,
                history,
            ));
        }
        Ok(ReActResponse::success(self.content.clone(), self.invoke.len() + 1))
    }
}

/// 返回 `<tool> result for <query>` 的适配器
pub struct CannedAdapter(pub ToolKind);

#[async_trait]
impl SearchAdapter for CannedAdapter {
    fn kind(&self) -> ToolKind {
        self.0
    }

    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let prefix = match self.0 {
            ToolKind::News => "news",
            ToolKind::Web => "web",
            ToolKind::Video => "video",
            ToolKind::Encyclopedia => "encyclopedia",
            ToolKind::None => "none",
        };
        Ok(SearchOutcome::from_items(vec![format!(
            "{} result for {}",
            prefix, query
        )]))
    }

    fn no_results_message(&self, query: &str) -> String {
        format!("No results found for query: {}", query)
    }

    fn error_message(&self, error: &SearchError) -> String {
        format!("Error searching: {}", error)
    }
}

pub fn toolbox_with(kinds: &[ToolKind]) -> SearchToolbox {
    kinds.iter().fold(SearchToolbox::empty(), |toolbox, kind| {
        toolbox.with_adapter(Arc::new(CannedAdapter(*kind)))
    })
}

pub fn context_with(
    config: Config,
    model: Arc<dyn LanguageModel>,
    tool_model: Arc<dyn ToolCallingModel>,
    toolbox: SearchToolbox,
) -> GeneratorContext {
    GeneratorContext::with_models(config, model, tool_model, toolbox)
}
