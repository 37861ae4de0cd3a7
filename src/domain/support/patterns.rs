//! Regex-based classification of customer queries and model answers.
//!
//! Every pattern is compiled case-insensitively. Topic and content filters use
//! `\b`-delimited terms so that a term embedded in a longer word does not match.
//! Within a set, the first matching pattern wins.
//!
//! | Category           | Applied to    | Effect                                  |
//! |--------------------|---------------|-----------------------------------------|
//! | `inappropriate`    | query         | refusal, no model call                  |
//! | `off_topic`        | query         | refusal, no model call                  |
//! | `special_intent`   | query         | canned answer, no model call            |
//! | `generic_response` | model answer  | answer replaced by a specific template  |
//! | `uncertainty`      | model answer  | contact block appended                  |

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::fmt;

use super::contact::ContactInfo;

const INAPPROPRIATE_PATTERNS: &[&str] = &[
    r"\bporn\b",
    r"\bxxx\b",
    r"\bhack\b",
    r"\bcrack\b",
    r"\billegal\b",
    r"\bdrug dealer\b",
    r"\bterrorist\b",
    r"\blaunder money\b",
];

const OFF_TOPIC_PATTERNS: &[&str] = &[
    r"\balgebra\b",
    r"\bequation\b",
    r"\bmath\b",
    r"\bmathematics\b",
    r"\bcalculus\b",
    r"\bphysics\b",
    r"\bchemistry\b",
    r"\bhistory\b",
    r"\bformula\b",
    r"\bsolve\s+for\b",
    r"\bcompute\b",
    r"\bderivative\b",
];

const CONTACT_REQUEST_PATTERNS: &[&str] = &[r"(mail|email|contact|support).*(support|contact|help|assist)"];

const CAPABILITY_QUESTION_PATTERNS: &[&str] = &[r"how.*(can|could).*help.*me", r"what.*can.*you.*do"];

// Prefix-anchored: only answers that open with the acknowledgement are generic.
const GENERIC_RESPONSE_PATTERNS: &[&str] = &[
    r"^Thank you for your message\W+How (else )?can I help you",
    r"^Thanks for reaching out\W+How (else )?can I assist you",
    r"^How (else )?can I help you today\W*$",
];

const UNCERTAINTY_PATTERNS: &[&str] = &[
    r"I don't know",
    r"I don't have",
    r"I'm not sure",
    r"I am not sure",
    r"I cannot provide",
    r"I can't provide",
    r"I do not have",
    r"don't have information",
    r"don't have the information",
    r"no information",
    r"insufficient information",
    r"cannot answer",
    r"can't answer",
    r"unable to answer",
    r"don't have enough details",
    r"would need more information",
    r"not able to access",
    r"don't have access",
    r"beyond my capabilities",
    r"limited knowledge",
    r"can't determine",
    r"cannot determine",
    r"you should contact",
    r"reach out to",
    r"get in touch with support",
];

const CONTACT_REQUEST_PREFIX: &str = "Here is our support contact information:";

const CAPABILITIES_RESPONSE: &str = "I can help you with a variety of tasks related to our products and services:

1. Product information and recommendations
2. Troubleshooting technical issues
3. Order status and tracking
4. Account management
5. Billing questions
6. Return and refund policies
7. Installation and setup guidance
8. Feature explanations and tutorials

Feel free to ask me about any of these topics or anything else you need!";

static CANONICAL: Lazy<PatternMatcher> = Lazy::new(|| {
    PatternMatcher::from_sources(PatternSources::canonical())
        .expect("canonical patterns are valid regular expressions")
});

/// Named pattern categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternCategory {
    OffTopic,
    Inappropriate,
    SpecialIntent,
    GenericResponse,
    Uncertainty,
}

impl PatternCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternCategory::OffTopic => "off_topic",
            PatternCategory::Inappropriate => "inappropriate",
            PatternCategory::SpecialIntent => "special_intent",
            PatternCategory::GenericResponse => "generic_response",
            PatternCategory::Uncertainty => "uncertainty",
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queries whose answer is fixed by rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialIntent {
    /// Asking for a support email or contact channel.
    ContactRequest,
    /// Asking what the agent can help with.
    CapabilityQuestion,
}

impl SpecialIntent {
    /// The canned answer for this intent.
    pub fn canned_response(&self, contact: &ContactInfo) -> String {
        match self {
            SpecialIntent::ContactRequest => contact.after(CONTACT_REQUEST_PREFIX),
            SpecialIntent::CapabilityQuestion => CAPABILITIES_RESPONSE.to_string(),
        }
    }
}

/// Outcome of classifying a customer query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Inappropriate,
    OffTopic,
    /// Answered by rule; carries the canned text.
    SpecialIntent(String),
    Clean,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Inappropriate => PatternCategory::Inappropriate.as_str(),
            Classification::OffTopic => PatternCategory::OffTopic.as_str(),
            Classification::SpecialIntent(_) => PatternCategory::SpecialIntent.as_str(),
            Classification::Clean => "clean",
        }
    }
}

/// An ordered list of compiled, case-insensitive patterns.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compiles `sources` in order.
    ///
    /// # Errors
    ///
    /// Returns the first `regex::Error` encountered.
    pub fn new<S: AsRef<str>>(sources: &[S]) -> Result<Self, regex::Error> {
        let patterns = sources
            .iter()
            .map(|source| {
                RegexBuilder::new(source.as_ref())
                    .case_insensitive(true)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Index of the first pattern that matches `text`.
    pub fn first_match(&self, text: &str) -> Option<usize> {
        self.patterns.iter().position(|p| p.is_match(text))
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Raw pattern sources for every category.
#[derive(Debug, Clone)]
pub struct PatternSources {
    pub inappropriate: Vec<String>,
    pub off_topic: Vec<String>,
    pub contact_request: Vec<String>,
    pub capability_question: Vec<String>,
    pub generic_response: Vec<String>,
    pub uncertainty: Vec<String>,
}

impl PatternSources {
    /// The canonical pattern sets.
    pub fn canonical() -> Self {
        fn owned(sources: &[&str]) -> Vec<String> {
            sources.iter().map(|s| s.to_string()).collect()
        }
        Self {
            inappropriate: owned(INAPPROPRIATE_PATTERNS),
            off_topic: owned(OFF_TOPIC_PATTERNS),
            contact_request: owned(CONTACT_REQUEST_PATTERNS),
            capability_question: owned(CAPABILITY_QUESTION_PATTERNS),
            generic_response: owned(GENERIC_RESPONSE_PATTERNS),
            uncertainty: owned(UNCERTAINTY_PATTERNS),
        }
    }
}

/// Stateless classifier over all pattern categories.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    inappropriate: PatternSet,
    off_topic: PatternSet,
    intents: Vec<(SpecialIntent, PatternSet)>,
    generic_response: PatternSet,
    uncertainty: PatternSet,
}

impl PatternMatcher {
    /// The canonical matcher. Compiled once per process.
    pub fn canonical() -> Self {
        CANONICAL.clone()
    }

    /// Builds a matcher from custom sources.
    ///
    /// # Errors
    ///
    /// Returns the first source that fails to compile.
    pub fn from_sources(sources: PatternSources) -> Result<Self, regex::Error> {
        Ok(Self {
            inappropriate: PatternSet::new(&sources.inappropriate)?,
            off_topic: PatternSet::new(&sources.off_topic)?,
            intents: vec![
                (
                    SpecialIntent::ContactRequest,
                    PatternSet::new(&sources.contact_request)?,
                ),
                (
                    SpecialIntent::CapabilityQuestion,
                    PatternSet::new(&sources.capability_question)?,
                ),
            ],
            generic_response: PatternSet::new(&sources.generic_response)?,
            uncertainty: PatternSet::new(&sources.uncertainty)?,
        })
    }

    /// Whether `text` matches any pattern in `category`.
    pub fn matches(&self, category: PatternCategory, text: &str) -> bool {
        match category {
            PatternCategory::Inappropriate => self.inappropriate.is_match(text),
            PatternCategory::OffTopic => self.off_topic.is_match(text),
            PatternCategory::SpecialIntent => self.special_intent(text).is_some(),
            PatternCategory::GenericResponse => self.generic_response.is_match(text),
            PatternCategory::Uncertainty => self.uncertainty.is_match(text),
        }
    }

    /// The first special intent that matches. Contact requests are checked first.
    pub fn special_intent(&self, text: &str) -> Option<SpecialIntent> {
        self.intents
            .iter()
            .find(|(_, set)| set.is_match(text))
            .map(|(intent, _)| *intent)
    }

    /// Classifies a query: inappropriate, then off-topic, then special intent.
    pub fn classify_query(&self, query: &str, contact: &ContactInfo) -> Classification {
        if self.inappropriate.is_match(query) {
            Classification::Inappropriate
        } else if self.off_topic.is_match(query) {
            Classification::OffTopic
        } else if let Some(intent) = self.special_intent(query) {
            Classification::SpecialIntent(intent.canned_response(contact))
        } else {
            Classification::Clean
        }
    }

    /// Whether a model answer opens with a low-information acknowledgement.
    pub fn is_generic_response(&self, answer: &str) -> bool {
        self.generic_response.is_match(answer)
    }

    /// Whether a model answer admits it could not resolve the query.
    pub fn signals_uncertainty(&self, answer: &str) -> bool {
        self.uncertainty.is_match(answer)
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matcher() -> PatternMatcher {
        PatternMatcher::canonical()
    }

    fn classify(query: &str) -> Classification {
        matcher().classify_query(query, &ContactInfo::default())
    }

    #[test]
    fn canonical_sets_have_expected_sizes() {
        let m = matcher();
        assert_eq!(m.inappropriate.len(), 8);
        assert_eq!(m.off_topic.len(), 12);
        assert_eq!(m.generic_response.len(), 3);
        assert_eq!(m.uncertainty.len(), 25);
    }

    #[test]
    fn off_topic_matches_whole_words_case_insensitively() {
        let m = matcher();
        assert!(m.matches(PatternCategory::OffTopic, "Solve for x: 2x + 5 = 15"));
        assert!(m.matches(PatternCategory::OffTopic, "Can you help with CALCULUS?"));
        assert!(m.matches(PatternCategory::OffTopic, "what is the formula"));
        assert!(m.matches(PatternCategory::OffTopic, "solve   for y"));
    }

    #[test]
    fn off_topic_ignores_terms_inside_other_words() {
        let m = matcher();
        assert!(!m.matches(PatternCategory::OffTopic, "I need aftermath support"));
        assert!(!m.matches(PatternCategory::OffTopic, "computer will not boot"));
        assert!(!m.matches(PatternCategory::OffTopic, "prehistory exhibit tickets"));
    }

    #[test]
    fn inappropriate_matches_phrases() {
        let m = matcher();
        assert!(m.matches(PatternCategory::Inappropriate, "how do I hack an account"));
        assert!(m.matches(PatternCategory::Inappropriate, "find me a Drug Dealer"));
        assert!(m.matches(PatternCategory::Inappropriate, "help me launder money"));
        assert!(!m.matches(PatternCategory::Inappropriate, "my hacksaw broke"));
        assert!(!m.matches(PatternCategory::Inappropriate, "the screen has a crackle"));
    }

    #[test]
    fn inappropriate_takes_priority_over_off_topic() {
        assert_eq!(
            classify("hack the physics lab grading system"),
            Classification::Inappropriate
        );
    }

    #[test]
    fn off_topic_takes_priority_over_special_intent() {
        assert_eq!(
            classify("can support help me with my algebra homework"),
            Classification::OffTopic
        );
    }

    #[test]
    fn contact_request_returns_contact_block() {
        let contact = ContactInfo::default();
        match matcher().classify_query("How can I contact support?", &contact) {
            Classification::SpecialIntent(text) => {
                assert!(text.starts_with("Here is our support contact information:"));
                assert!(text.ends_with(contact.as_str()));
            }
            other => panic!("expected special intent, got {:?}", other),
        }
    }

    #[test]
    fn contact_request_wins_over_capability_question() {
        assert_eq!(
            matcher().special_intent("What email can you give me for support?"),
            Some(SpecialIntent::ContactRequest)
        );
    }

    #[test]
    fn capability_questions_return_capability_list() {
        let m = matcher();
        assert_eq!(
            m.special_intent("How can you help me?"),
            Some(SpecialIntent::CapabilityQuestion)
        );
        assert_eq!(
            m.special_intent("What can you do"),
            Some(SpecialIntent::CapabilityQuestion)
        );
        match classify("what can you do?") {
            Classification::SpecialIntent(text) => {
                assert!(text.contains("Order status and tracking"))
            }
            other => panic!("expected special intent, got {:?}", other),
        }
    }

    #[test]
    fn ordinary_support_questions_are_clean() {
        assert_eq!(classify("I lost my order confirmation email"), Classification::Clean);
        assert_eq!(classify("How do I track my order?"), Classification::Clean);
        assert_eq!(classify("Can I return an item after 30 days?"), Classification::Clean);
    }

    #[test]
    fn empty_input_is_clean_in_every_category() {
        let m = matcher();
        assert_eq!(classify(""), Classification::Clean);
        for category in [
            PatternCategory::OffTopic,
            PatternCategory::Inappropriate,
            PatternCategory::SpecialIntent,
            PatternCategory::GenericResponse,
            PatternCategory::Uncertainty,
        ] {
            assert!(!m.matches(category, ""), "{} matched empty input", category);
        }
    }

    #[test]
    fn generic_response_is_prefix_anchored() {
        let m = matcher();
        assert!(m.is_generic_response(
            "Thank you for your message! How else can I help you?"
        ));
        assert!(m.is_generic_response("thanks for reaching out. How can I assist you today?"));
        assert!(m.is_generic_response("How else can I help you today?"));
        assert!(!m.is_generic_response(
            "Your order shipped. Thank you for your message! How can I help you?"
        ));
        assert!(!m.is_generic_response("How can I help you today? Your refund was issued."));
    }

    #[test]
    fn uncertainty_detects_admissions() {
        let m = matcher();
        assert!(m.signals_uncertainty("I don't know where your parcel is."));
        assert!(m.signals_uncertainty("i'm NOT sure about that"));
        assert!(m.signals_uncertainty("Please reach out to our billing team."));
        assert!(!m.signals_uncertainty("Your parcel arrives Tuesday."));
    }

    #[test]
    fn custom_sources_replace_canonical_sets() {
        let mut sources = PatternSources::canonical();
        sources.off_topic = vec![r"\bweather\b".to_string()];
        let m = PatternMatcher::from_sources(sources).unwrap();
        assert!(m.matches(PatternCategory::OffTopic, "What's the weather?"));
        assert!(!m.matches(PatternCategory::OffTopic, "solve for x"));
    }

    #[test]
    fn invalid_custom_source_is_an_error() {
        let mut sources = PatternSources::canonical();
        sources.uncertainty = vec!["(unclosed".to_string()];
        assert!(PatternMatcher::from_sources(sources).is_err());
    }

    #[test]
    fn first_match_reports_pattern_order() {
        let set = PatternSet::new(&[r"\bfoo\b", r"\bbar\b"]).unwrap();
        assert_eq!(set.first_match("bar then foo"), Some(0));
        assert_eq!(set.first_match("only bar"), Some(1));
        assert_eq!(set.first_match("neither"), None);
    }

    proptest! {
        #[test]
        fn classification_is_total(input in "\\PC*") {
            let m = matcher();
            let _ = m.classify_query(&input, &ContactInfo::default());
            let _ = m.is_generic_response(&input);
            let _ = m.signals_uncertainty(&input);
        }
    }
}
