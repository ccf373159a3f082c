use gen_vision::{
    assets::HttpAssetFetcher,
    logger::{self, LoggerConfig},
    server::{self, AppState},
    AnimationSet, Config, GeminiClient,
};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let config = Config::from_env();

    logger::init_with_config(LoggerConfig::from_app_config(&config)?)?;
    if dotenv_loaded {
        log::info!(".env file loaded");
    } else {
        log::warn!("No .env file found, using process environment");
    }
    logger::log_config_info(&config);

    let http = reqwest::Client::new();
    let fetcher = HttpAssetFetcher::with_client(http.clone());

    // A missing required animation stops start-up here.
    let animations = match AnimationSet::load(&config.assets, &fetcher).await {
        Ok(animations) => animations,
        Err(e) => {
            log::error!("Failed to load animations: {}", e);
            return Err(e.into());
        }
    };

    let client = GeminiClient::with_http_client(http, config.gemini.clone());
    let state = AppState::new(Arc::new(client), animations);

    let (host, port) = config.bind_address();
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &host, port);

    server::run(&config, state).await?;
    Ok(())
}
