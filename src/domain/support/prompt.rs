//! Prompt composition for the external model.
//!
//! The composer is pure: the same conversation and agent always produce the
//! same [`Prompt`]. Two renderings are supported because not every model
//! interface accepts a distinct system role:
//!
//! - [`PromptVariant::SystemRole`] emits the context block as a leading system turn.
//! - [`PromptVariant::Inline`] folds the context block into the first user turn.
//!
//! Both keep every message at its original position with its content intact.

use serde::Deserialize;

use super::agent::AgentConfig;
use super::message::{Conversation, Role};

const GUIDELINES: &str = "IMPORTANT GUIDELINES:
1. Only answer questions that are relevant to customer support, products, services, and business inquiries.
2. If asked about topics like mathematics, algebra, science, or any other unrelated subjects, politely decline to answer and explain you're a customer support agent.
3. Answer directly and specifically. Never respond with just \"Thank you for your message. How else can I help?\"
4. If you don't know the answer or can't help with a question, provide our contact information.
5. Always be professional, concise, and helpful within your scope.";

/// How the context block is delivered to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptVariant {
    /// Leading system-role turn.
    #[default]
    SystemRole,
    /// Prepended to the first user turn.
    Inline,
}

/// Role of a turn as the model sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptRole {
    System,
    User,
    Model,
}

impl From<Role> for PromptRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => PromptRole::User,
            Role::Agent => PromptRole::Model,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTurn {
    pub role: PromptRole,
    pub text: String,
}

impl PromptTurn {
    pub fn new(role: PromptRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// The payload handed to a model provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    turns: Vec<PromptTurn>,
}

impl Prompt {
    pub fn new(turns: Vec<PromptTurn>) -> Self {
        Self { turns }
    }

    pub fn turns(&self) -> &[PromptTurn] {
        &self.turns
    }

    /// Text of the leading system turn, if any.
    pub fn system_text(&self) -> Option<&str> {
        match self.turns.first() {
            Some(turn) if turn.role == PromptRole::System => Some(&turn.text),
            _ => None,
        }
    }

    /// All turns after the leading system turn.
    pub fn history(&self) -> &[PromptTurn] {
        if self.system_text().is_some() {
            &self.turns[1..]
        } else {
            &self.turns
        }
    }
}

/// Renders conversations into prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer {
    variant: PromptVariant,
}

impl PromptComposer {
    pub fn new(variant: PromptVariant) -> Self {
        Self { variant }
    }

    /// Agent identity, instructions, fixed guidelines and optional knowledge.
    pub fn context_block(&self, agent: &AgentConfig) -> String {
        let mut block = format!(
            "You are {}, a customer support agent.\nInstructions: {}\n\n{}\n",
            agent.name(),
            agent.instructions(),
            GUIDELINES
        );
        if let Some(knowledge) = agent.knowledge_base() {
            block.push_str(&format!("\nReference knowledge: {}", knowledge));
        }
        block
    }

    pub fn compose(&self, conversation: &Conversation, agent: &AgentConfig) -> Prompt {
        let context = self.context_block(agent);
        match self.variant {
            PromptVariant::SystemRole => Self::with_system_turn(conversation, context),
            PromptVariant::Inline => Self::with_inline_context(conversation, context),
        }
    }

    fn with_system_turn(conversation: &Conversation, context: String) -> Prompt {
        let mut turns = Vec::with_capacity(conversation.len() + 1);
        turns.push(PromptTurn::new(PromptRole::System, context));
        turns.extend(
            conversation
                .messages()
                .iter()
                .map(|m| PromptTurn::new(m.role().into(), m.content())),
        );
        Prompt::new(turns)
    }

    fn with_inline_context(conversation: &Conversation, context: String) -> Prompt {
        let Some(first_user) = conversation.first_user_position() else {
            // Nothing to fold into; lead with the context as its own user turn.
            let mut turns = Vec::with_capacity(conversation.len() + 1);
            turns.push(PromptTurn::new(PromptRole::User, context));
            turns.extend(
                conversation
                    .messages()
                    .iter()
                    .map(|m| PromptTurn::new(m.role().into(), m.content())),
            );
            return Prompt::new(turns);
        };

        let turns = conversation
            .messages()
            .iter()
            .enumerate()
            .map(|(i, m)| {
                if i == first_user {
                    PromptTurn::new(
                        PromptRole::User,
                        format!("{}\n\nUser question: {}", context, m.content()),
                    )
                } else {
                    PromptTurn::new(m.role().into(), m.content())
                }
            })
            .collect();
        Prompt::new(turns)
    }
}
