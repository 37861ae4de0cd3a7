//! Customer-support relay domain.
//!
//! - `message` - Conversation and message value types
//! - `agent` - Per-request agent configuration and the agent catalog
//! - `contact` - The shared contact block
//! - `patterns` - Regex classification of queries and model answers
//! - `prompt` - Deterministic prompt composition
//! - `policy` - Pre-filter short circuits and post-filter answer shaping

mod agent;
mod contact;
mod message;
mod patterns;
mod policy;
mod prompt;

pub use agent::{agent_catalog, AgentConfig, AgentProfile};
pub use contact::{ContactInfo, DEFAULT_CONTACT_INFO};
pub use message::{Conversation, Message, Role};
pub use patterns::{
    Classification, PatternCategory, PatternMatcher, PatternSet, PatternSources, SpecialIntent,
};
pub use policy::{Augmentation, PolicyConfig, QuerySelection, ResponsePolicy, ShapedAnswer};
pub use prompt::{Prompt, PromptComposer, PromptRole, PromptTurn, PromptVariant};
