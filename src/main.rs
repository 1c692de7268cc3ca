use options_strategist::api::{self, AppState};
use options_strategist::clients::{OpenAiClient, OptionsDataClient};
use options_strategist::config::Config;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "options_strategist=debug,tower_http=info".into()),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{}", e))?;
    tracing::debug!(?config, "Loaded configuration");

    // Initialize clients
    let options_client = Arc::new(OptionsDataClient::new(&config).map_err(|e| anyhow::anyhow!("{}", e))?);
    let openai_client = Arc::new(OpenAiClient::new(&config).map_err(|e| anyhow::anyhow!("{}", e))?);

    let app_state = Arc::new(AppState::new(options_client, openai_client));
    let app = api::create_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
