use tokio::net::TcpListener;

use plainwiki::{build_router, logger::Logger, AppState, Config, WikiError};

#[tokio::main]
async fn main() -> Result<(), WikiError> {
    if let Err(e) = Logger::init() {
        eprintln!("plainwiki: logger already initialized: {}", e);
    }

    let config = Config::from_env()?;
    log::debug!("Configuration: {:?}", config);

    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    log::info!(
        "Wiki listening on http://{}:{} (pages in {:?}, titles {:?})",
        config.host,
        config.port,
        config.data_dir,
        config.title_mode
    );
    axum::serve(listener, app).await.map_err(WikiError::from)
}
