use std::net::TcpListener;

use posts_server::infrastructure::config::AppConfig;
use posts_server::infrastructure::logging::init_logging;
use posts_server::server::{self, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config).await?;
    let listener = TcpListener::bind((config.host.as_str(), config.port))?;

    server::run(&config, state, listener)?.await?;
    Ok(())
}
