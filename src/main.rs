use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use support_relay::adapters::ai::{GeminiConfig, GeminiProvider};
use support_relay::adapters::http::{app_router, HttpSettings, SupportAppState};
use support_relay::application::SupportRequestHandler;
use support_relay::config::{AppConfig, ConfigError, GEMINI_API_KEY_FALLBACK};
use support_relay::domain::support::{ResponsePolicy, DEFAULT_CONTACT_INFO};
use support_relay::ports::{AIError, AIProvider};

#[derive(Debug, thiserror::Error)]
enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("model provider setup failed: {0}")]
    Provider(#[source] AIError),
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).compact().init();
    }
}

fn build_provider(config: &AppConfig) -> Result<Option<Arc<dyn AIProvider>>, BootstrapError> {
    let Some(api_key) = config.ai.api_key() else {
        warn!(
            fallback_var = GEMINI_API_KEY_FALLBACK,
            "Gemini API key is not configured; support requests that need the model will fail"
        );
        return Ok(None);
    };

    let gemini = GeminiConfig::new(api_key.clone())
        .with_model(config.ai.model.clone())
        .with_base_url(config.ai.base_url.clone())
        .with_timeout(config.ai.timeout());
    let provider = GeminiProvider::new(gemini).map_err(BootstrapError::Provider)?;

    let info = provider.provider_info();
    info!(provider = %info.name, model = %info.model, "Model provider configured");
    Ok(Some(Arc::new(provider)))
}

#[tokio::main]
async fn main() -> Result<(), BootstrapError> {
    let config = AppConfig::load()?;
    init_logging(&config);
    config.validate().map_err(ConfigError::from)?;

    let policy = config.support.to_policy_config().map_err(ConfigError::from)?;
    if config.support.contact_info == DEFAULT_CONTACT_INFO {
        warn!("Using placeholder contact info; set SUPPORT_RELAY__SUPPORT__CONTACT_INFO");
    }
    let handler = SupportRequestHandler::new(
        Arc::new(ResponsePolicy::new(policy)),
        build_provider(&config)?,
    )
    .with_generation(config.ai.max_output_tokens, config.ai.temperature);

    let settings = HttpSettings {
        request_timeout: config.server.request_timeout(),
        cors_origins: config.server.cors_origins_list(),
    };
    let app = app_router(SupportAppState::new(handler), &settings);

    let addr = config.server.socket_addr().map_err(ConfigError::from)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "Support relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    info!("Support relay stopped");
    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
