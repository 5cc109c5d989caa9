use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, Instrument};

use crate::http::connection::Connection;
use crate::server::state::AppState;

pub async fn run(listen_addr: &str, app: Arc<AppState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, app).await
}

/// Accepts connections forever, one task each.
pub async fn serve(listener: TcpListener, app: Arc<AppState>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                // EMFILE, ECONNABORTED and the like are transient.
                tracing::warn!(error = %e, "Failed to accept connection");
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let app = Arc::clone(&app);
        let span = tracing::info_span!("conn", %peer);
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, app);
                match conn.run().await {
                    Ok(()) => tracing::debug!("Connection closed"),
                    Err(e) => tracing::error!(error = %e, "Connection dropped without response"),
                }
            }
            .instrument(span),
        );
    }
}
