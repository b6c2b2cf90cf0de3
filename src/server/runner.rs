//! Server execution logic.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use super::handler::handle_connection;
use super::signal::shutdown_signal;
use super::state::AppState;

/// A bound chat relay, ready to accept connections.
///
/// Binding and running are split so callers (tests in particular) can bind
/// to port 0 and read back the actual address before starting the accept
/// loop.
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the listening socket. Failure here is fatal for the caller;
    /// there is no retry.
    pub async fn bind(host: &str, port: u16) -> std::io::Result<Self> {
        let listener = TcpListener::bind(format!("{}:{}", host, port)).await?;
        Ok(Self {
            listener,
            state: Arc::new(AppState::new()),
        })
    }

    /// The address the listener actually bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the shutdown signal fires.
    ///
    /// Each accepted connection gets its own spawned handler; the accept
    /// loop never waits on a handler. A failed accept is logged and skipped,
    /// it does not stop the loop.
    pub async fn run(self) -> std::io::Result<()> {
        tracing::info!("Chat relay listening on {}", self.listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => {
                            tracing::debug!("Accepted connection from {}", addr);
                            tokio::spawn(handle_connection(stream, addr, self.state.clone()));
                        }
                        Err(e) => {
                            tracing::warn!("Accept failed: {}", e);
                        }
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Run the chat relay server.
///
/// # Arguments
///
/// * `host` - The host address to bind to (e.g., "127.0.0.1")
/// * `port` - The port number to bind to (e.g., 8080)
pub async fn run_server(host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let server = Server::bind(&host, port).await?;
    server.run().await?;
    Ok(())
}
