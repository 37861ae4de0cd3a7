//! Response policy: which queries bypass the model and how model answers are shaped.
//!
//! The policy owns the contact block. Every refusal, canned answer and
//! augmentation draws it from here, so a deployment configures it exactly once.

use serde::Deserialize;

use super::agent::AgentConfig;
use super::contact::ContactInfo;
use super::message::Conversation;
use super::patterns::{Classification, PatternMatcher};
use super::prompt::{Prompt, PromptComposer, PromptVariant};

const INAPPROPRIATE_REFUSAL: &str =
    "I'm sorry, but I cannot assist with inappropriate or illegal topics. ";

const OFF_TOPIC_REFUSAL: &str = "I'm sorry, but I can only assist with questions related to our products, services, and customer support. I cannot help with topics like algebra or other academic subjects. ";

const SPECIFIC_HELP_TEMPLATE: &str = "I'd be happy to help you more specifically.

For questions about our products and services, I can provide details on features, pricing, and compatibility.

For technical support, I can help troubleshoot issues or provide guidance on using our products.

For account or billing questions, I can explain our policies and options.

Please let me know what specific information you're looking for, and I'll assist you right away.
";

/// Which message of the conversation is screened by the pre-filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuerySelection {
    /// The most recent customer message. Empty if the customer has not spoken.
    #[default]
    LastUserMessage,
    /// The first message of the conversation, whatever its role.
    FirstMessage,
}

impl QuerySelection {
    pub fn select<'a>(&self, conversation: &'a Conversation) -> &'a str {
        let message = match self {
            QuerySelection::LastUserMessage => conversation.last_user_message(),
            QuerySelection::FirstMessage => conversation.first_message(),
        };
        message.map(|m| m.content()).unwrap_or_default()
    }
}

/// Deployment knobs for the policy.
#[derive(Debug, Clone, Default)]
pub struct PolicyConfig {
    pub matcher: PatternMatcher,
    pub contact_info: ContactInfo,
    pub prompt_variant: PromptVariant,
    pub query_selection: QuerySelection,
}

/// What the post-filter did to a model answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Augmentation {
    /// Answer passed through untouched.
    None,
    /// Generic acknowledgement replaced by the specific-help template.
    ReplacedGeneric,
    /// Contact block appended after an admission of uncertainty.
    AppendedContact,
}

impl Augmentation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Augmentation::None => "none",
            Augmentation::ReplacedGeneric => "replaced_generic",
            Augmentation::AppendedContact => "appended_contact",
        }
    }
}

/// A model answer after the post-filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedAnswer {
    pub text: String,
    pub augmentation: Augmentation,
}

#[derive(Debug, Clone)]
pub struct ResponsePolicy {
    matcher: PatternMatcher,
    contact: ContactInfo,
    composer: PromptComposer,
    query_selection: QuerySelection,
}

impl ResponsePolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self {
            matcher: config.matcher,
            contact: config.contact_info,
            composer: PromptComposer::new(config.prompt_variant),
            query_selection: config.query_selection,
        }
    }

    pub fn contact_info(&self) -> &ContactInfo {
        &self.contact
    }

    /// The text the pre-filter screens.
    pub fn query<'a>(&self, conversation: &'a Conversation) -> &'a str {
        self.query_selection.select(conversation)
    }

    pub fn classify(&self, query: &str) -> Classification {
        self.matcher.classify_query(query, &self.contact)
    }

    /// The terminal reply for a classification, or `None` if the model must answer.
    pub fn short_circuit_reply(&self, classification: &Classification) -> Option<String> {
        match classification {
            Classification::Inappropriate => Some(self.contact.after(INAPPROPRIATE_REFUSAL)),
            Classification::OffTopic => Some(self.contact.after(OFF_TOPIC_REFUSAL)),
            Classification::SpecialIntent(text) => Some(text.clone()),
            Classification::Clean => None,
        }
    }

    pub fn compose(&self, conversation: &Conversation, agent: &AgentConfig) -> Prompt {
        self.composer.compose(conversation, agent)
    }

    /// Post-filter. Generic-answer substitution takes priority over the
    /// uncertainty append; at most one of them runs.
    pub fn shape_answer(&self, answer: String) -> ShapedAnswer {
        if self.matcher.is_generic_response(&answer) {
            return ShapedAnswer {
                text: self.contact.after(SPECIFIC_HELP_TEMPLATE),
                augmentation: Augmentation::ReplacedGeneric,
            };
        }

        if self.matcher.signals_uncertainty(&answer) && !self.contact.is_trailing(&answer) {
            return ShapedAnswer {
                text: self.contact.ensure_trailing(answer),
                augmentation: Augmentation::AppendedContact,
            };
        }

        ShapedAnswer {
            text: answer,
            augmentation: Augmentation::None,
        }
    }
}

impl Default for ResponsePolicy {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}
