//! The business contact block shown whenever the relay cannot answer confidently.

use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::ValidationError;

/// Contact block used when no deployment-specific block is configured.
///
/// The details are placeholders. Production deployments must set
/// `SUPPORT_RELAY__SUPPORT__CONTACT_INFO` to their real block.
pub const DEFAULT_CONTACT_INFO: &str = "
For further assistance, please contact us at:
Email: support@example.com
24/7 Support: +1 555 0100
Business Hours: Mon-Fri, 9am-6pm
";

/// Process-wide contact block. Loaded once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInfo(Arc<str>);

impl ContactInfo {
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` if the block is blank.
    pub fn new(block: impl Into<String>) -> Result<Self, ValidationError> {
        let block = block.into();
        if block.trim().is_empty() {
            return Err(ValidationError::empty_field("contact_info"));
        }
        Ok(Self(Arc::from(block)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `text` followed by the block.
    pub fn after(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + self.0.len());
        out.push_str(text);
        out.push_str(&self.0);
        out
    }

    /// Appends the block unless `text` already ends with it.
    pub fn ensure_trailing(&self, mut text: String) -> String {
        if !self.is_trailing(&text) {
            text.push_str(&self.0);
        }
        text
    }

    pub fn is_trailing(&self, text: &str) -> bool {
        text.ends_with(&*self.0)
    }
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self(Arc::from(DEFAULT_CONTACT_INFO))
    }
}

impl fmt::Display for ContactInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
