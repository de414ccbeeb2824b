//! Follow-up questions answered from a prior image analysis.

use crate::analysis::ImageAnalysis;
use crate::error::{Result, VisionQaError};
use crate::llm::{CompletionConfig, LlmGateway, LlmMessage};
use std::sync::Arc;
use tracing::{error, info};

pub const DEFAULT_ANSWER_MODEL: &str = "gpt-4-turbo-preview";

pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers questions based on the given image analysis.";

/// Answers free-text questions using an [`ImageAnalysis`] as context.
pub struct QuestionAnswerer {
    gateway: Arc<dyn LlmGateway>,
    model: String,
    config: CompletionConfig,
}

impl QuestionAnswerer {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            model: DEFAULT_ANSWER_MODEL.to_string(),
            config: CompletionConfig::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The two-message conversation sent for `question`.
    pub fn conversation(question: &str, analysis: &ImageAnalysis) -> Result<Vec<LlmMessage>> {
        let context = analysis.to_pretty_json()?;
        Ok(vec![
            LlmMessage::system(SYSTEM_PROMPT),
            LlmMessage::user(format!(
                "Image Analysis:\n{}\n\nQuestion: {}\n\nAnswer:",
                context, question
            )),
        ])
    }

    async fn ask(&self, question: &str, analysis: &ImageAnalysis) -> Result<String> {
        let messages = Self::conversation(question, analysis)?;
        let response = self.gateway.complete(&self.model, &messages, &self.config).await?;
        let content = response
            .content
            .ok_or_else(|| VisionQaError::GatewayError("No content in response".to_string()))?;
        Ok(content.trim().to_string())
    }

    /// Answer `question`. Failures come back as text starting with `Error:`.
    pub async fn answer(&self, question: &str, analysis: &ImageAnalysis) -> String {
        info!(model = %self.model, "Answering question");

        match self.ask(question, analysis).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, "Question answering failed");
                describe_failure(&e)
            }
        }
    }
}

fn describe_failure(err: &VisionQaError) -> String {
    if err.is_timeout() {
        return "Error: The request timed out. Please try again.".to_string();
    }
    match err {
        VisionQaError::ApiError(msg) => format!("Error: An API error occurred: {}", msg),
        other => format!("Error: An unexpected error occurred: {}", other),
    }
}
