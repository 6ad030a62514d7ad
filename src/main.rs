use anyhow::Result;
use api_server::{ApiTokens, AppState, GeoCache};
use common::{SuggestClient, config::Config};
use dotenvy::dotenv;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = common::logging_stdout();
    dotenv().ok();

    let config = Config::from_env()?;

    let cache = GeoCache::new(config.cache.ttl, config.cache.max_capacity);
    info!(
        kind = cache.kind(),
        ttl = ?config.cache.ttl,
        max_capacity = ?config.cache.max_capacity,
        "address cache ready"
    );

    let provider = SuggestClient::new(config.suggest.clone())?;
    info!(
        api_base = %config.suggest.api_base,
        timeout = ?config.suggest.timeout,
        "suggestion client ready"
    );

    let tokens = if config.auth_disabled {
        warn!("AUTH_DISABLED is set, address routes are not protected");
        ApiTokens::disabled()
    } else {
        info!(count = config.api_tokens.len(), "bearer tokens loaded");
        ApiTokens::new(config.api_tokens)
    };

    let state = AppState::new(provider, cache, tokens);
    api_server::run_api_server(config.listen_addr, state).await?;

    Ok(())
}
