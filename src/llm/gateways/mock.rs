//! Scripted gateway for testing.
//!
//! Replays queued outcomes in order and records every request it receives,
//! so tests can drive the analyzer and answerer without a network.

use crate::error::Result;
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One request seen by [`MockGateway`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub model: String,
    pub messages: Vec<LlmMessage>,
    pub config: CompletionConfig,
}

#[derive(Debug, Default)]
pub struct MockGateway {
    outcomes: Mutex<VecDeque<Result<LlmGatewayResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGateway {
    pub fn new(outcomes: Vec<Result<LlmGatewayResponse>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Gateway answering each call with the given texts in order.
    pub fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(LlmGatewayResponse::text(*t))).collect())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmGateway for MockGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                model: model.to_string(),
                messages: messages.to_vec(),
                config: config.clone(),
            });
        }

        self.outcomes
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Ok(LlmGatewayResponse::text("default response")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VisionQaError;

    #[tokio::test]
    async fn test_mock_gateway_replays_in_order() {
        let gateway = MockGateway::new(vec![
            Ok(LlmGatewayResponse::text("first")),
            Err(VisionQaError::TimeoutError("slow".to_string())),
        ]);
        let config = CompletionConfig::default();

        let first = gateway.complete("m", &[LlmMessage::user("a")], &config).await.unwrap();
        assert_eq!(first.content.as_deref(), Some("first"));

        let second = gateway.complete("m", &[LlmMessage::user("b")], &config).await;
        assert!(second.unwrap_err().is_timeout());

        let third = gateway.complete("m", &[], &config).await.unwrap();
        assert_eq!(third.content.as_deref(), Some("default response"));

        let calls = gateway.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].messages, vec![LlmMessage::user("b")]);
    }
}
