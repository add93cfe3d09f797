//! Gateway server

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use super::forward::MtlsForwarder;
use super::router::{AppState, create_router};
use crate::config::Config;
use crate::credentials::CredentialSet;
use crate::{Error, Result};

/// Cora proxy server
pub struct Gateway {
    /// Configuration
    config: Config,
    /// Shared request-handling state
    state: Arc<AppState>,
}

impl Gateway {
    /// Create a new gateway.
    ///
    /// Decodes the credential material and builds the mTLS client up front:
    /// a process with missing or undecodable credentials refuses to start.
    pub fn new(config: Config) -> Result<Self> {
        let credentials = Arc::new(CredentialSet::from_config(&config.credentials)?);
        let forwarder = MtlsForwarder::new(&credentials, config.upstream.clone())?;

        let state = Arc::new(AppState {
            credentials,
            forwarder: Arc::new(forwarder),
        });

        Ok(Self { config, state })
    }

    /// Run the gateway
    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::new(
            self.config
                .server
                .host
                .parse()
                .map_err(|e| Error::Config(format!("Invalid host: {e}")))?,
            self.config.server.port,
        );

        let app = create_router(Arc::clone(&self.state));
        let listener = TcpListener::bind(addr).await?;

        info!("============================================================");
        info!("CORA PROXY v{}", env!("CARGO_PKG_VERSION"));
        info!("============================================================");
        info!(host = %self.config.server.host, port = %self.config.server.port, "Listening");
        info!(
            stage = %self.config.upstream.stage_host,
            production = %self.config.upstream.production_host,
            timeout = ?self.config.upstream.timeout,
            "Upstream targets"
        );
        info!("Routes: /health, /oauth/token, invoices, balance, transfers, statements, /proxy/*");
        info!("============================================================");

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        info!("Shutdown complete");
        Ok(())
    }
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
