//! HTTP DTOs for support endpoints
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::handlers::support::{ErrorKind, SupportRequestError};
use crate::domain::foundation::ValidationError;
use crate::domain::support::{AgentConfig, AgentProfile, Conversation, Message, Role};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/support`
#[derive(Debug, Clone, Deserialize)]
pub struct SupportRequest {
    pub conversation: ConversationDto,
    pub agent_config: AgentConfigDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationDto {
    pub messages: Vec<MessageDto>,
    /// Accepted and carried along; the relay does not interpret it.
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageDto {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfigDto {
    pub name: String,
    pub instructions: String,
    #[serde(default)]
    pub knowledge_base: Option<String>,
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        Message::new(dto.role, dto.content, dto.timestamp)
    }
}

impl From<ConversationDto> for Conversation {
    fn from(dto: ConversationDto) -> Self {
        let conversation = Conversation::new(dto.messages.into_iter().map(Message::from).collect());
        match dto.metadata {
            Some(metadata) => conversation.with_metadata(metadata),
            None => conversation,
        }
    }
}

impl TryFrom<AgentConfigDto> for AgentConfig {
    type Error = ValidationError;

    fn try_from(dto: AgentConfigDto) -> Result<Self, Self::Error> {
        let agent = AgentConfig::new(dto.name, dto.instructions)?;
        Ok(match dto.knowledge_base {
            Some(kb) => agent.with_knowledge_base(kb),
            None => agent,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for `POST /api/support`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportResponse {
    pub response: MessageDto,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role(),
            content: message.content().to_string(),
            timestamp: message.timestamp().map(str::to_string),
        }
    }
}

/// Response for `GET /api/agents`
#[derive(Debug, Clone, Serialize)]
pub struct AgentsResponse {
    pub agents: &'static [AgentProfile],
}

/// Response for `GET /api/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Error payload shared by every support endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ErrorResponse {
    pub fn client_input(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ClientInput,
            detail: detail.into(),
        }
    }
}

impl From<&SupportRequestError> for ErrorResponse {
    fn from(err: &SupportRequestError) -> Self {
        Self {
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}
