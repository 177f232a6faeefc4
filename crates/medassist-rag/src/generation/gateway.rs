//! Completion gateway: prompt selection plus bounded calls to the chat model

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::providers::{with_retry, CompletionProvider, RetryPolicy};

use super::prompt::PromptBuilder;

/// Sends general or grounded prompts to the completion provider
pub struct CompletionGateway {
    provider: Arc<dyn CompletionProvider>,
    prompts: PromptBuilder,
    retry: RetryPolicy,
}

impl CompletionGateway {
    /// Create a gateway with timeout and retry settings from `config`
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &LlmConfig) -> Self {
        Self {
            provider,
            prompts: PromptBuilder::new(config.temperature),
            retry: RetryPolicy::for_completion(config),
        }
    }

    /// Override the timeout/retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Answer `question`, grounded in `context` when given
    ///
    /// The model's text is returned verbatim.
    pub async fn complete(&self, question: &str, context: Option<&str>) -> Result<String> {
        let prompt = match context {
            Some(context) => self.prompts.grounded(question, context),
            None => self.prompts.general(question),
        };

        tracing::debug!(
            "Completion via {}/{} (grounded: {})",
            self.provider.name(),
            self.provider.model(),
            context.is_some()
        );

        with_retry(&self.retry, "completion", || self.provider.complete(&prompt))
            .await
            .map_err(|e| match e {
                Error::Completion { .. } | Error::Timeout { .. } => e,
                other => Error::completion(other.to_string()),
            })
    }
}
