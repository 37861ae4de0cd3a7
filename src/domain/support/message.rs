//! Conversation messages exchanged between a customer and a support agent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::Timestamp;

/// Who sent a message.
///
/// Only `user` is the customer; any other incoming role (`assistant`,
/// `model`, `system`, ...) is read as [`Role::Agent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The customer.
    User,
    /// The support agent (human or model).
    #[serde(other)]
    Agent,
}

impl Role {
    pub fn is_user(self) -> bool {
        self == Role::User
    }
}

/// A single message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
    timestamp: Option<String>,
}

impl Message {
    /// Creates a message with an optional caller-supplied timestamp.
    pub fn new(role: Role, content: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }

    /// Creates an unstamped user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, None)
    }

    /// Creates an agent message stamped at `at`.
    pub fn agent(content: impl Into<String>, at: Timestamp) -> Self {
        Self::new(Role::Agent, content, Some(at.to_iso8601()))
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }
}

/// Ordered message history; insertion order is chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
    metadata: Option<Map<String, Value>>,
}

impl Conversation {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            metadata: None,
        }
    }

    /// Attaches free-form caller metadata. The relay carries it but never reads it.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.metadata.as_ref()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The first message regardless of role.
    pub fn first_message(&self) -> Option<&Message> {
        self.messages.first()
    }

    /// The most recent message sent by the customer.
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role().is_user())
    }

    /// Position of the earliest message sent by the customer.
    pub fn first_user_position(&self) -> Option<usize> {
        self.messages.iter().position(|m| m.role().is_user())
    }
}
