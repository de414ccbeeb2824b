#[cfg(test)]
pub mod mock;
pub mod openai;
pub mod openai_messages_adapter;

#[cfg(test)]
pub use mock::MockGateway;
pub use openai::{OpenAIConfig, OpenAIGateway};
