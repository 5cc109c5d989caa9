use std::sync::Arc;

use rawhttpd::config::Config;
use rawhttpd::server::{listener, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.max_level())
        .init();

    tracing::info!(root = %cfg.static_files.root.display(), "Serving static files");
    let app = Arc::new(AppState::from_config(&cfg));

    tokio::select! {
        res = listener::run(&cfg.server.listen_addr, app) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
