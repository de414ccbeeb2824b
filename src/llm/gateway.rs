use crate::error::Result;
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use async_trait::async_trait;

/// Configuration for LLM completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionConfig {
    /// Cap on generated tokens; provider default when `None`
    pub max_tokens: Option<u32>,
}

impl CompletionConfig {
    pub fn with_max_tokens(max_tokens: u32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
        }
    }
}

/// Abstract interface for chat-completion providers
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Complete an LLM request with text response
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_config_default() {
        let config = CompletionConfig::default();

        assert_eq!(config.max_tokens, None);
    }

    #[test]
    fn test_completion_config_with_max_tokens() {
        let config = CompletionConfig::with_max_tokens(1000);

        assert_eq!(config.max_tokens, Some(1000));
    }
}
