//! Ask a vision-capable chat model to read an image, then answer one
//! follow-up question from that reading.
//!
//! The flow is two sequential chat-completion calls behind the
//! [`llm::LlmGateway`] trait: [`analysis::ImageAnalyzer`] produces an
//! [`analysis::ImageAnalysis`], and [`answer::QuestionAnswerer`] answers a
//! question with that analysis as context. [`session::Session`] drives both
//! from line-based console input.

pub mod analysis;
pub mod answer;
pub mod cli;
pub mod error;
pub mod llm;
pub mod session;

pub use error::{Result, VisionQaError};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{AnalysisReport, ImageAnalysis, ImageAnalyzer};
    pub use crate::answer::QuestionAnswerer;
    pub use crate::error::{Result, VisionQaError};
    pub use crate::llm::gateways::{OpenAIConfig, OpenAIGateway};
    pub use crate::llm::{CompletionConfig, LlmGateway, LlmMessage, MessageRole};
    pub use crate::session::Session;
}
