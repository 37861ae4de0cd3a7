//! Per-request agent configuration and the published agent catalog.

use serde::Serialize;

use crate::domain::foundation::ValidationError;

/// Caller-owned agent identity. Supplied with every request and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    name: String,
    instructions: String,
    knowledge_base: Option<String>,
}

impl AgentConfig {
    /// Creates an agent configuration.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` if `name` is blank.
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("agent_config.name"));
        }
        Ok(Self {
            name,
            instructions: instructions.into(),
            knowledge_base: None,
        })
    }

    /// Attaches reference knowledge. Blank text is treated as absent.
    pub fn with_knowledge_base(mut self, knowledge_base: impl Into<String>) -> Self {
        let knowledge_base = knowledge_base.into();
        self.knowledge_base = if knowledge_base.trim().is_empty() {
            None
        } else {
            Some(knowledge_base)
        };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn knowledge_base(&self) -> Option<&str> {
        self.knowledge_base.as_deref()
    }
}

/// Descriptive catalog entry for an available agent persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const CATALOG: &[AgentProfile] = &[
    AgentProfile {
        id: "general_support",
        name: "General Support Agent",
        description: "A general customer support agent that can handle a wide range of queries.",
    },
    AgentProfile {
        id: "technical_support",
        name: "Technical Support Agent",
        description: "Specialized in solving technical issues and product troubleshooting.",
    },
    AgentProfile {
        id: "sales_agent",
        name: "Sales Agent",
        description: "Helps with product inquiries, pricing, and purchasing decisions.",
    },
];

/// Hand-maintained list of agent personas offered to clients.
pub fn agent_catalog() -> &'static [AgentProfile] {
    CATALOG
}
