use anyhow::Result;
use clap::Parser;
use content_strategist::cli::Args;
use content_strategist::launch;
use tracing_subscriber::EnvFilter;

/// 日志级别环境变量
const LOG_ENV: &str = "STRATEGIST_LOG";

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("content_strategist={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env 中的凭据，文件不存在时忽略
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let request = args.workflow_request();
    let config = args.into_config()?;

    launch(&config, &request).await?;
    Ok(())
}
