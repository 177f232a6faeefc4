//! Answer generation against the hosted chat model

pub mod gateway;
pub mod prompt;

pub use gateway::CompletionGateway;
pub use prompt::PromptBuilder;
