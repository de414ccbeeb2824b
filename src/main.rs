use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vision_qa::cli::Cli;
use vision_qa::llm::gateways::OpenAIGateway;

/// Logs go to stderr so stdout carries only the session text.
fn init_tracing(default_filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_filter());

    let gateway =
        OpenAIGateway::with_config(cli.openai_config()).context("failed to set up OpenAI client")?;
    let session = cli.session(Arc::new(gateway));

    session
        .run(std::io::stdin().lock(), std::io::stdout().lock())
        .await
        .context("console I/O failed")?;

    Ok(())
}
