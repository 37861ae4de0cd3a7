//! SupportRequestHandler - Answer one customer turn.
//!
//! Validates the conversation, screens the query, and either returns a
//! canned reply or asks the model and shapes its answer.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::support::{
    AgentConfig, Augmentation, Classification, Conversation, Message, ResponsePolicy,
};
use crate::ports::{AIError, AIProvider, CompletionRequest};

/// Command to answer the latest state of a conversation.
#[derive(Debug, Clone)]
pub struct SupportRequestCommand {
    pub conversation: Conversation,
    pub agent: AgentConfig,
    pub trace_id: String,
}

/// Result of a support request.
#[derive(Debug, Clone)]
pub struct SupportRequestResult {
    /// The agent reply to hand back to the customer.
    pub response: Message,
    pub classification: Classification,
    /// `None` when the model was never called.
    pub augmentation: Option<Augmentation>,
}

impl SupportRequestResult {
    pub fn model_called(&self) -> bool {
        self.augmentation.is_some()
    }
}

/// Failure category, used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ClientInput,
    Configuration,
    UpstreamProvider,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ClientInput => "client_input",
            ErrorKind::Configuration => "configuration",
            ErrorKind::UpstreamProvider => "upstream_provider",
        }
    }
}

/// Error type for support requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SupportRequestError {
    #[error("No messages provided")]
    EmptyConversation,

    #[error("{0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Model provider credential is not configured")]
    MissingCredential,

    #[error("Model provider error: {0}")]
    Upstream(#[from] AIError),
}

impl SupportRequestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SupportRequestError::EmptyConversation | SupportRequestError::InvalidInput(_) => {
                ErrorKind::ClientInput
            }
            SupportRequestError::MissingCredential => ErrorKind::Configuration,
            SupportRequestError::Upstream(_) => ErrorKind::UpstreamProvider,
        }
    }
}

/// Handler for support requests.
///
/// Cheap to share: the policy and provider are behind `Arc` and never mutated.
#[derive(Clone)]
pub struct SupportRequestHandler {
    policy: Arc<ResponsePolicy>,
    provider: Option<Arc<dyn AIProvider>>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl SupportRequestHandler {
    /// A `None` provider means no credential was configured; requests that
    /// need the model then fail with [`SupportRequestError::MissingCredential`].
    pub fn new(policy: Arc<ResponsePolicy>, provider: Option<Arc<dyn AIProvider>>) -> Self {
        Self {
            policy,
            provider,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Sets generation limits forwarded to the provider.
    pub fn with_generation(mut self, max_tokens: Option<u32>, temperature: Option<f32>) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn policy(&self) -> &ResponsePolicy {
        &self.policy
    }

    pub async fn handle(
        &self,
        cmd: SupportRequestCommand,
    ) -> Result<SupportRequestResult, SupportRequestError> {
        // 1. Validate
        if cmd.conversation.is_empty() {
            warn!(trace_id = %cmd.trace_id, "Rejected support request without messages");
            return Err(SupportRequestError::EmptyConversation);
        }

        // 2. Pre-filter
        let query = self.policy.query(&cmd.conversation);
        let classification = self.policy.classify(query);

        if let Some(reply) = self.policy.short_circuit_reply(&classification) {
            info!(
                trace_id = %cmd.trace_id,
                classification = classification.label(),
                model_called = false,
                "Support request answered by pre-filter"
            );
            return Ok(SupportRequestResult {
                response: Message::agent(reply, Timestamp::now()),
                classification,
                augmentation: None,
            });
        }

        // 3. Compose and call
        let Some(provider) = self.provider.as_ref() else {
            warn!(trace_id = %cmd.trace_id, "Model provider credential is not configured");
            return Err(SupportRequestError::MissingCredential);
        };

        let prompt = self.policy.compose(&cmd.conversation, &cmd.agent);
        let request = CompletionRequest::new(prompt, cmd.trace_id.clone())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        let completion = provider.complete(request).await.map_err(|err| {
            warn!(trace_id = %cmd.trace_id, error = %err, "Model provider call failed");
            SupportRequestError::Upstream(err)
        })?;

        // 4. Post-filter
        let shaped = self.policy.shape_answer(completion.content);

        info!(
            trace_id = %cmd.trace_id,
            classification = classification.label(),
            model_called = true,
            model = %completion.model,
            augmentation = shaped.augmentation.as_str(),
            "Support request answered by model"
        );

        // 5. Emit
        Ok(SupportRequestResult {
            response: Message::agent(shaped.text, Timestamp::now()),
            classification,
            augmentation: Some(shaped.augmentation),
        })
    }
}
