//! Command-line and environment configuration.

use crate::analysis::{ImageAnalyzer, DEFAULT_ANALYSIS_MAX_TOKENS, DEFAULT_VISION_MODEL};
use crate::answer::{QuestionAnswerer, DEFAULT_ANSWER_MODEL};
use crate::llm::gateways::openai::{OpenAIConfig, DEFAULT_BASE_URL};
use crate::llm::LlmGateway;
use crate::session::Session;
use std::sync::Arc;
use std::time::Duration;

/// Read text from an image with a vision model, then ask a question about it
#[derive(clap::Parser, Debug, Clone)]
#[command(name = "vision-qa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_API_ENDPOINT", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Vision-capable model used to analyze the image
    #[arg(long, env = "VISION_QA_VISION_MODEL", default_value = DEFAULT_VISION_MODEL)]
    pub vision_model: String,

    /// Model used to answer the follow-up question
    #[arg(long, env = "VISION_QA_ANSWER_MODEL", default_value = DEFAULT_ANSWER_MODEL)]
    pub answer_model: String,

    /// Cap on tokens generated for the image analysis
    #[arg(long, default_value_t = DEFAULT_ANALYSIS_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Per-request time limit, in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn openai_config(&self) -> OpenAIConfig {
        OpenAIConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: Some(Duration::from_secs(self.timeout)),
        }
    }

    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "vision_qa=debug"
        } else {
            "warn"
        }
    }

    /// Wire analyzer and answer model onto one gateway.
    pub fn session(&self, gateway: Arc<dyn LlmGateway>) -> Session {
        let analyzer = ImageAnalyzer::new(gateway.clone())
            .with_model(&self.vision_model)
            .with_max_tokens(self.max_tokens);
        let answerer = QuestionAnswerer::new(gateway).with_model(&self.answer_model);
        Session::new(analyzer, answerer)
    }
}
