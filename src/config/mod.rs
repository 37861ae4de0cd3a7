//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SUPPORT_RELAY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use support_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod ai;
mod error;
mod server;
mod support;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use support::SupportConfig;

use secrecy::Secret;
use serde::Deserialize;

/// Bare variable accepted when `SUPPORT_RELAY__AI__GEMINI_API_KEY` is unset.
pub const GEMINI_API_KEY_FALLBACK: &str = "GEMINI_API_KEY";

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// (if credential-less) configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Model provider configuration (Gemini)
    #[serde(default)]
    pub ai: AiConfig,

    /// Support policy configuration (contact block, prompt variant, query selection)
    #[serde(default)]
    pub support: SupportConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SUPPORT_RELAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Falls back to `GEMINI_API_KEY` for the model credential
    ///
    /// # Environment Variable Format
    ///
    /// - `SUPPORT_RELAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SUPPORT_RELAY__SUPPORT__PROMPT_VARIANT=inline` -> `support.prompt_variant`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SUPPORT_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if !config.ai.has_api_key() {
            config.ai.gemini_api_key = std::env::var(GEMINI_API_KEY_FALLBACK)
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(Secret::new);
        }

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// A missing API key is not an error here; the binary warns about it
    /// and requests that need the model fail with a configuration error.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.support.validate()?;

        if self.server.request_timeout_secs <= self.ai.timeout_secs {
            return Err(ValidationError::TimeoutOrdering {
                server: self.server.request_timeout_secs,
                provider: self.ai.timeout_secs,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::support::{PromptVariant, QuerySelection};
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("SUPPORT_RELAY__SERVER__PORT");
        env::remove_var("SUPPORT_RELAY__SERVER__ENVIRONMENT");
        env::remove_var("SUPPORT_RELAY__SERVER__REQUEST_TIMEOUT_SECS");
        env::remove_var("SUPPORT_RELAY__AI__TIMEOUT_SECS");
        env::remove_var("SUPPORT_RELAY__AI__GEMINI_API_KEY");
        env::remove_var("SUPPORT_RELAY__AI__TEMPERATURE");
        env::remove_var("SUPPORT_RELAY__SUPPORT__PROMPT_VARIANT");
        env::remove_var("SUPPORT_RELAY__SUPPORT__QUERY_SELECTION");
        env::remove_var(GEMINI_API_KEY_FALLBACK);
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.environment, Environment::Development);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prefixed_api_key() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SUPPORT_RELAY__AI__GEMINI_API_KEY", "prefixed-key");
        env::set_var(GEMINI_API_KEY_FALLBACK, "bare-key");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.api_key().unwrap().expose_secret(), "prefixed-key");
    }

    #[test]
    fn test_bare_api_key_fallback() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(GEMINI_API_KEY_FALLBACK, "bare-key");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.api_key().unwrap().expose_secret(), "bare-key");
    }

    #[test]
    fn test_support_settings_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SUPPORT_RELAY__SUPPORT__PROMPT_VARIANT", "inline");
        env::set_var("SUPPORT_RELAY__SUPPORT__QUERY_SELECTION", "first_message");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.support.prompt_variant, PromptVariant::Inline);
        assert_eq!(config.support.query_selection, QuerySelection::FirstMessage);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SUPPORT_RELAY__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SUPPORT_RELAY__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_out_of_range_temperature_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SUPPORT_RELAY__AI__TEMPERATURE", "3.5");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature));
    }

    #[test]
    fn test_request_timeout_must_outlast_provider_timeout() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SUPPORT_RELAY__SERVER__REQUEST_TIMEOUT_SECS", "60");
        env::set_var("SUPPORT_RELAY__AI__TIMEOUT_SECS", "60");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::TimeoutOrdering {
                server: 60,
                provider: 60
            })
        );
    }
}
