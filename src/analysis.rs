//! Image analysis through a vision-capable chat model.
//!
//! [`ImageAnalyzer::analyze`] sends one image reference with a fixed
//! instruction and returns an [`ImageAnalysis`]. It never fails: decoding
//! problems degrade to [`ImageAnalysis::Unparsed`] and transport problems to
//! [`ImageAnalysis::Failed`].

use crate::error::{Result, VisionQaError};
use crate::llm::{CompletionConfig, LlmGateway, LlmMessage};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const DEFAULT_VISION_MODEL: &str = "gpt-4-vision-preview";
pub const DEFAULT_ANALYSIS_MAX_TOKENS: u32 = 1000;

pub const ANALYSIS_PROMPT: &str = "Analyze this image. Extract all visible text. If it's a flowchart, graph, or diagram, describe the relationships and structure. Provide a detailed description of the content. Format your response as a JSON object with keys for 'extracted_text', 'structure_description', and 'content_description'.";

pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please try again.";

/// Decoded reply of the vision model.
///
/// The model is asked for `extracted_text`, `structure_description` and
/// `content_description`, but whatever JSON it returns is kept as-is, key
/// order included. The accessors give typed views of the requested keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnalysisReport(Value);

impl AnalysisReport {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn extracted_text(&self) -> Option<&str> {
        self.text_field("extracted_text")
    }

    pub fn structure_description(&self) -> Option<&str> {
        self.text_field("structure_description")
    }

    pub fn content_description(&self) -> Option<&str> {
        self.text_field("content_description")
    }

    /// Whether all three requested keys hold strings.
    pub fn is_complete(&self) -> bool {
        self.extracted_text().is_some()
            && self.structure_description().is_some()
            && self.content_description().is_some()
    }

    fn text_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

/// Outcome of analyzing one image.
///
/// Serializes to the flat objects shown to the user and fed to the answer
/// model: the decoded reply itself, `{"raw_content": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImageAnalysis {
    Analyzed(AnalysisReport),
    Unparsed {
        #[serde(rename = "raw_content")]
        raw: String,
    },
    Failed {
        #[serde(rename = "error")]
        reason: String,
    },
}

impl ImageAnalysis {
    /// Interpret the model's reply text. Only text that is not JSON at all
    /// falls back to [`ImageAnalysis::Unparsed`].
    pub fn from_reply(content: &str) -> Self {
        match serde_json::from_str::<Value>(content) {
            Ok(value) => {
                let report = AnalysisReport::new(value);
                if !report.is_complete() {
                    warn!("Analysis reply lacks some of the requested text fields");
                }
                ImageAnalysis::Analyzed(report)
            }
            Err(e) => {
                warn!(error = %e, "Analysis reply is not JSON, keeping raw text");
                ImageAnalysis::Unparsed {
                    raw: content.to_string(),
                }
            }
        }
    }

    /// Map a failed call onto the user-facing failure value.
    pub fn from_error(err: &VisionQaError) -> Self {
        let reason = if err.is_timeout() {
            TIMEOUT_MESSAGE.to_string()
        } else {
            format!("An error occurred while analyzing the image: {}", err)
        };
        ImageAnalysis::Failed { reason }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ImageAnalysis::Failed { .. })
    }

    /// Two-space indented JSON rendering.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Sends images to a vision model and interprets the reply.
pub struct ImageAnalyzer {
    gateway: Arc<dyn LlmGateway>,
    model: String,
    config: CompletionConfig,
}

impl ImageAnalyzer {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            model: DEFAULT_VISION_MODEL.to_string(),
            config: CompletionConfig::with_max_tokens(DEFAULT_ANALYSIS_MAX_TOKENS),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    fn request(image_url: &str) -> Vec<LlmMessage> {
        vec![LlmMessage::user(ANALYSIS_PROMPT).with_images(vec![image_url.to_string()])]
    }

    async fn fetch_reply(&self, image_url: &str) -> Result<String> {
        let response =
            self.gateway.complete(&self.model, &Self::request(image_url), &self.config).await?;
        if let Some(usage) = response.usage {
            debug!(total_tokens = usage.total_tokens, "Analysis token usage");
        }
        response
            .content
            .ok_or_else(|| VisionQaError::GatewayError("No content in response".to_string()))
    }

    /// Analyze the image at `image_url`. Makes exactly one request.
    pub async fn analyze(&self, image_url: &str) -> ImageAnalysis {
        info!(model = %self.model, "Analyzing image");

        match self.fetch_reply(image_url).await {
            Ok(content) => ImageAnalysis::from_reply(&content),
            Err(e) => {
                error!(error = %e, "Image analysis failed");
                ImageAnalysis::from_error(&e)
            }
        }
    }
}
