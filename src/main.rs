use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use news_sentiment::{
    config::Config,
    api::routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(
        feed = %config.feed_base_url,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "starting news sentiment service"
    );

    let app_state = AppState::from_config(config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
