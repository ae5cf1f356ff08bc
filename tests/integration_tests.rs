use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use content_strategist::config::{AdapterConfig, Config};
use content_strategist::generator::compose::CreationChain;
use content_strategist::generator::context::GeneratorContext;
use content_strategist::generator::research::AnalysisChain;
use content_strategist::generator::types::{PipelineError, StageKind};
use content_strategist::llm::{
    CompletionRequest, LanguageModel, ReActConfig, ReActResponse, ToolCallingModel, ToolSession,
};
use content_strategist::search::{SearchToolbox, TavilyAdapter, ToolKind};
use content_strategist::session::{LogStatus, WorkflowSession};
use content_strategist::{WorkflowRequest, run};

const TOPICS: &str = "\
Here are the topics I found:

Topic 1: Async standups replace status meetings
Why it matters: Teams reclaim focus time
Key angle: What managers lose and gain

Topic 2: AI assistants inside project trackers
Why it matters: Less manual triage
Key angle: Practical rollout checklist";

const ANGLES: &str = "\
**Angle 1: The Contrarian Angle**
Hook: Your tracker is not the problem.

**Angle 2: The How-To/Practical Angle**
Hook: Five steps to a calmer backlog.";

/// 记录调用顺序的补全模型，可在指定阶段失败
struct RecordingModel {
    fail_on: Option<&'static str>,
    calls: Mutex<Vec<String>>,
}

impl RecordingModel {
    fn new() -> Self {
        Self {
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(tag: &'static str) -> Self {
        Self {
            fail_on: Some(tag),
            ..Self::new()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for RecordingModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.log_tag.clone());
        if self.fail_on == Some(request.log_tag.as_str()) {
            return Err(anyhow!("model overloaded"));
        }
        let reply = match request.log_tag.as_str() {
            "topic_analysis" => TOPICS.to_string(),
            "angle_generation" => ANGLES.to_string(),
            "drafting" => format!("Draft based on:\n{}", request.user_prompt),
            "critique" => "STRENGTHS: clear\nPRIORITY FIXES: shorter hook".to_string(),
            "formatting" => "Your tracker is not the problem.\n\nWhat do you think?".to_string(),
            other => format!("{} output", other),
        };
        Ok(reply)
    }
}

/// 先调用网页检索，再把检索结果作为最终回答
struct WebFirstModel;

#[async_trait]
impl ToolCallingModel for WebFirstModel {
    async fn complete_with_tools(
        &self,
        _request: CompletionRequest,
        session: &ToolSession,
        _react_config: &ReActConfig,
    ) -> Result<ReActResponse> {
        let observation = session
            .invoke(ToolKind::Web, "best project management tools")
            .await?;
        session.invoke(ToolKind::Video, "project management demo").await?;
        Ok(ReActResponse::success(
            format!("Research summary:\n{}", observation),
            3,
        ))
    }
}

struct UnreachableModel;

#[async_trait]
impl ToolCallingModel for UnreachableModel {
    async fn complete_with_tools(
        &self,
        _request: CompletionRequest,
        _session: &ToolSession,
        _react_config: &ReActConfig,
    ) -> Result<ReActResponse> {
        Err(anyhow!("connection refused"))
    }
}

async fn tavily_server() -> (mockito::ServerGuard, mockito::Mock) {
    let body = serde_json::json!({
        "answer": "Linear, Jira and Asana lead the market.",
        "results": [
            {"title": "Top PM tools", "url": "https://web.example/pm", "content": "A comparison.", "score": 0.9}
        ]
    });
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;
    (server, mock)
}

fn toolbox_for(server: &mockito::ServerGuard) -> SearchToolbox {
    let mut config = Config::default().search;
    config.youtube.base_url = server.url();
    let tavily = TavilyAdapter::new(AdapterConfig {
        base_url: server.url(),
        api_key: "tvly-test".to_string(),
        max_results: 5,
        timeout_seconds: None,
    })
    .unwrap();
    SearchToolbox::from_config(&config)
        .unwrap()
        .with_adapter(Arc::new(tavily))
}

fn context(
    model: Arc<RecordingModel>,
    tool_model: Arc<dyn ToolCallingModel>,
    toolbox: SearchToolbox,
    output: Option<&TempDir>,
) -> GeneratorContext {
    let config = Config {
        output_path: output.map(|dir| dir.path().to_path_buf()),
        ..Default::default()
    };
    GeneratorContext::with_models(config, model, tool_model, toolbox)
}

#[tokio::test]
async fn test_analysis_uses_first_invoked_tool() {
    let (server, mock) = tavily_server().await;
    let model = Arc::new(RecordingModel::new());
    let chain = AnalysisChain::new(context(
        model.clone(),
        Arc::new(WebFirstModel),
        toolbox_for(&server),
        None,
    ));

    let result = chain.invoke("best project management tools").await;

    mock.assert_async().await;
    assert!(result.is_success());
    assert_eq!(result.tool_used.label(), "Tavily Web Search");
    assert!(result.reasoning.starts_with("Selected web search"));
    assert!(result.research_data.contains("Linear, Jira and Asana lead the market."));

    let topics = result.parsed_topics();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0].title, "Async standups replace status meetings");
    assert_eq!(topics[1].angle_hint, "Practical rollout checklist");
    assert_eq!(model.calls(), vec!["topic_analysis"]);
}

#[tokio::test]
async fn test_creation_chain_records_every_stage() {
    let model = Arc::new(RecordingModel::new());
    let chain = CreationChain::new(context(
        model.clone(),
        Arc::new(UnreachableModel),
        SearchToolbox::empty(),
        None,
    ));
    let mut session = WorkflowSession::new();

    let result = chain
        .invoke_in_session(&mut session, "AI assistants inside project trackers", "")
        .await;

    assert!(result.is_success());
    assert_eq!(
        model.calls(),
        vec!["angle_generation", "drafting", "critique", "formatting"]
    );
    assert_eq!(
        result.selected_angle,
        "**Angle 1: The Contrarian Angle**\nHook: Your tracker is not the problem."
    );
    assert!(result.draft.contains("Chosen Angle"));
    assert!(result.final_post.ends_with("What do you think?"));
    assert_eq!(session.log.last().unwrap().status, LogStatus::Success);
}

#[tokio::test]
async fn test_creation_short_circuits_at_each_stage() {
    let stages = [
        ("angle_generation", StageKind::Angles, 1),
        ("drafting", StageKind::Drafting, 2),
        ("critique", StageKind::Critique, 3),
        ("formatting", StageKind::Formatting, 4),
    ];

    for (tag, stage, expected_calls) in stages {
        let model = Arc::new(RecordingModel::failing_on(tag));
        let chain = CreationChain::new(context(
            model.clone(),
            Arc::new(UnreachableModel),
            SearchToolbox::empty(),
            None,
        ));

        let result = chain.invoke("Edge AI", "").await;

        assert_eq!(model.calls().len(), expected_calls, "stage {}", tag);
        assert_eq!(
            result.failure,
            Some(PipelineError::stage(stage, "model overloaded"))
        );
        assert!(result.failure.as_ref().unwrap().to_string().contains("Error"));
        assert_eq!(
            result.final_post,
            format!("{}: model overloaded", stage.error_prefix())
        );
        assert_eq!(result.topic, "Edge AI");

        let json = serde_json::to_value(&result).unwrap();
        for field in ["topic", "angles", "selected_angle", "draft", "critique", "final_post"] {
            assert!(json[field].is_string(), "field {} missing", field);
        }
    }
}

#[tokio::test]
async fn test_research_failure_short_circuits_analysis() {
    let model = Arc::new(RecordingModel::new());
    let chain = AnalysisChain::new(context(
        model.clone(),
        Arc::new(UnreachableModel),
        SearchToolbox::empty(),
        None,
    ));
    let mut session = WorkflowSession::new();

    let result = chain.invoke_in_session(&mut session, "fintech").await;

    assert!(model.calls().is_empty());
    assert_eq!(result.tool_used, ToolKind::None);
    assert_eq!(result.research_data, "Error during research: connection refused");
    assert_eq!(result.reasoning, "Failed to complete research: connection refused");
    assert!(result.topics.contains("Error"));
    assert!(session.has_errors());
}

#[tokio::test]
async fn test_full_workflow_persists_session() {
    let (server, _mock) = tavily_server().await;
    let model = Arc::new(RecordingModel::new());
    let output = TempDir::new().unwrap();
    let context = context(
        model.clone(),
        Arc::new(WebFirstModel),
        toolbox_for(&server),
        Some(&output),
    );
    let request = WorkflowRequest {
        field: Some("project management".to_string()),
        pick: 2,
        create: true,
        ..Default::default()
    };

    let session = run(&context, &request).await.unwrap();

    assert_eq!(
        session.selected_topic.as_ref().unwrap().title,
        "AI assistants inside project trackers"
    );
    assert_eq!(model.calls().len(), 5);
    let steps: Vec<_> = session.log.iter().map(|entry| entry.step.as_str()).collect();
    assert_eq!(steps.first(), Some(&"Setup"));
    assert_eq!(steps.last(), Some(&"Done"));

    let post = std::fs::read_to_string(output.path().join("post.md")).unwrap();
    assert!(post.starts_with("Your tracker is not the problem."));
    let snapshot = std::fs::read_to_string(output.path().join("session.json")).unwrap();
    let restored: WorkflowSession = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(restored.log.len(), session.log.len());
}
