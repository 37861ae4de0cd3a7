//! Support policy configuration

use serde::Deserialize;

use crate::domain::support::{
    ContactInfo, PolicyConfig, PromptVariant, QuerySelection, DEFAULT_CONTACT_INFO,
};

use super::error::ValidationError;

/// Support policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SupportConfig {
    /// Contact block appended to refusals and uncertain answers
    #[serde(default = "default_contact_info")]
    pub contact_info: String,

    /// How agent context reaches the model
    #[serde(default)]
    pub prompt_variant: PromptVariant,

    /// Which message the pre-filter screens
    #[serde(default)]
    pub query_selection: QuerySelection,
}

impl SupportConfig {
    /// Build the policy configuration with the canonical pattern sets.
    pub fn to_policy_config(&self) -> Result<PolicyConfig, ValidationError> {
        let contact_info =
            ContactInfo::new(self.contact_info.clone()).map_err(|_| ValidationError::BlankContactInfo)?;
        Ok(PolicyConfig {
            contact_info,
            prompt_variant: self.prompt_variant,
            query_selection: self.query_selection,
            ..PolicyConfig::default()
        })
    }

    /// Validate support configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.contact_info.trim().is_empty() {
            return Err(ValidationError::BlankContactInfo);
        }
        Ok(())
    }
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            contact_info: default_contact_info(),
            prompt_variant: PromptVariant::default(),
            query_selection: QuerySelection::default(),
        }
    }
}

fn default_contact_info() -> String {
    DEFAULT_CONTACT_INFO.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_config_defaults() {
        let config = SupportConfig::default();
        assert_eq!(config.contact_info, DEFAULT_CONTACT_INFO);
        assert_eq!(config.prompt_variant, PromptVariant::SystemRole);
        assert_eq!(config.query_selection, QuerySelection::LastUserMessage);
    }

    #[test]
    fn test_to_policy_config_carries_settings() {
        let config = SupportConfig {
            contact_info: "\nCall 555-0199\n".to_string(),
            prompt_variant: PromptVariant::Inline,
            query_selection: QuerySelection::FirstMessage,
        };
        let policy = config.to_policy_config().unwrap();
        assert_eq!(policy.contact_info.as_str(), "\nCall 555-0199\n");
        assert_eq!(policy.prompt_variant, PromptVariant::Inline);
        assert_eq!(policy.query_selection, QuerySelection::FirstMessage);
    }

    #[test]
    fn test_blank_contact_info_rejected() {
        let config = SupportConfig {
            contact_info: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::BlankContactInfo));
        assert!(config.to_policy_config().is_err());
    }
}
