use crate::config::Config;
use crate::generator::compose::CreationChain;
use crate::generator::context::GeneratorContext;
use crate::generator::outlet::{DiskOutlet, Outlet};
use crate::generator::research::AnalysisChain;
use crate::generator::types::{AnalysisResult, CreationResult, PipelineError, Topic};
use crate::llm::LLMClient;
use crate::session::{LogStatus, WorkflowSession, WorkflowStep};

use anyhow::{Result, bail};
use std::collections::HashMap;
use std::time::Duration;

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: std::time::Instant,
    phase_start_times: HashMap<String, std::time::Instant>,
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .insert(phase_name.to_string(), std::time::Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let start_time = self.phase_start_times.remove(phase_name)?;
        let duration = start_time.elapsed();
        self.phase_durations
            .push((phase_name.to_string(), duration));
        Some(duration)
    }

    pub fn phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒",
            self.start_time.elapsed().as_secs_f64()
        );
        for (phase, duration) in &self.phase_durations {
            report.push_str(&format!("\n- {}: {:.3}秒", phase, duration.as_secs_f64()));
        }
        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const ANALYSIS: &'static str = "analysis";
    pub const CREATION: &'static str = "creation";
    pub const OUTPUT: &'static str = "output";
}

/// 一次运行要做的事
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRequest {
    /// 调研的领域或话题
    pub field: Option<String>,
    /// 从分析结果中选取的话题序号，1起始
    pub pick: usize,
    /// 分析之后是否继续创作
    pub create: bool,
    /// 直接指定创作话题，跳过分析
    pub topic: Option<String>,
    /// 指定角度，为空时取第一个生成的角度
    pub angle: String,
}

impl Default for WorkflowRequest {
    fn default() -> Self {
        Self {
            field: None,
            pick: 1,
            create: false,
            topic: None,
            angle: String::new(),
        }
    }
}

/// 启动内容创作工作流
pub async fn launch(config: &Config, request: &WorkflowRequest) -> Result<WorkflowSession> {
    let missing = config.missing_credentials();
    if !missing.is_empty() {
        tracing::warn!(
            "缺少以下凭据: {}。请在 .env 或配置文件中设置，或通过命令行参数传入",
            missing.join(", ")
        );
    }

    let llm_client = LLMClient::new(config)?;
    // 启动时检查模型连接
    llm_client.check_connection().await?;

    let context = GeneratorContext::from_client(config.clone(), llm_client)?;
    let session = run(&context, request).await?;

    if let Some(failure) = last_failure(&session) {
        bail!(failure);
    }
    Ok(session)
}

/// 在给定上下文中执行工作流，失败的链只记录在会话中
pub async fn run(context: &GeneratorContext, request: &WorkflowRequest) -> Result<WorkflowSession> {
    let mut timing = TimingScope::new();
    let mut session = WorkflowSession::new();
    session.log(WorkflowStep::SETUP, "Getting ready...", LogStatus::Info);

    let topic = match (&request.topic, &request.field) {
        (Some(title), _) => Some(Topic {
            title: title.clone(),
            ..Default::default()
        }),
        (None, Some(field)) => {
            timing.start_phase(TimingKeys::ANALYSIS);
            let analysis = AnalysisChain::new(context.clone())
                .invoke_in_session(&mut session, field)
                .await;
            timing.end_phase(TimingKeys::ANALYSIS);
            print_analysis(&analysis);

            if request.create && analysis.is_success() {
                match analysis.topic(request.pick) {
                    Ok(topic) => Some(topic),
                    Err(e) => {
                        session.log(WorkflowStep::ERROR, e.to_string(), LogStatus::Error);
                        None
                    }
                }
            } else {
                None
            }
        }
        (None, None) => bail!("Either a field to research or a topic to write about is required"),
    };

    if let Some(topic) = topic {
        println!("\n✍️ 创作话题: {}", topic.title);
        session.select_topic(topic.clone());

        timing.start_phase(TimingKeys::CREATION);
        let creation = CreationChain::new(context.clone())
            .invoke_in_session(&mut session, &topic.title, &request.angle)
            .await;
        timing.end_phase(TimingKeys::CREATION);
        print_creation(&creation);
    }

    if let Some(output_dir) = &context.config.output_path {
        timing.start_phase(TimingKeys::OUTPUT);
        let outlet = DiskOutlet::new(output_dir, context.config.target_language);
        let written = outlet.save(&session).await?;
        timing.end_phase(TimingKeys::OUTPUT);
        for path in written {
            println!("💾 已保存: {}", path.display());
        }
    }

    tracing::info!("{}", timing.generate_timing_report());
    Ok(session)
}

/// 会话中最后一个失败：创作优先于分析，其次是日志中的错误条目
fn last_failure(session: &WorkflowSession) -> Option<String> {
    let chain_failure: Option<&PipelineError> = session
        .creation
        .as_ref()
        .and_then(|creation| creation.failure.as_ref())
        .or_else(|| {
            session
                .analysis
                .as_ref()
                .and_then(|analysis| analysis.failure.as_ref())
        });

    chain_failure.map(|e| e.to_string()).or_else(|| {
        session
            .log
            .iter()
            .rev()
            .find(|entry| entry.status == LogStatus::Error)
            .map(|entry| entry.message.clone())
    })
}

fn print_analysis(analysis: &AnalysisResult) {
    println!("\n🔎 调研工具: {}", analysis.tool_used);
    println!("🧭 选择理由: {}", analysis.reasoning);

    if let Some(failure) = &analysis.failure {
        println!("❌ {}", failure);
        return;
    }

    let topics = analysis.parsed_topics();
    if topics.is_empty() {
        println!("⚠️ 未能从分析结果中解析出话题，原始输出如下:\n{}", analysis.topics);
        return;
    }
    println!("\n💡 候选话题:");
    for (index, topic) in topics.iter().enumerate() {
        println!("{}. {}", index + 1, topic.title);
        if !topic.rationale.is_empty() {
            println!("   Why it matters: {}", topic.rationale);
        }
        if !topic.angle_hint.is_empty() {
            println!("   Key angle: {}", topic.angle_hint);
        }
    }
}

fn print_creation(creation: &CreationResult) {
    match &creation.failure {
        Some(failure) => println!("❌ {}", failure),
        None => println!("\n📝 最终帖子:\n\n{}", creation.final_post),
    }
}
