// Server module entry point
// Listener setup, the accept loop and graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

pub use connection::accept_connection;
pub use listener::create_listener;
pub use signal::shutdown_signal;

/// How long shutdown waits for open connections to finish
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// A bound viewer server
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
}

impl Server {
    /// Bind the address from the state's `[server]` configuration
    pub fn bind(state: Arc<AppState>) -> crate::Result<Self> {
        let addr = state.config.socket_addr()?;
        Self::bind_to(addr, state)
    }

    /// Bind `addr`, port 0 picks a free port
    pub fn bind_to(addr: SocketAddr, state: Arc<AppState>) -> crate::Result<Self> {
        let listener =
            create_listener(addr).map_err(|source| crate::Error::Bind { addr, source })?;
        Ok(Self {
            listener,
            state,
            active_connections: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }

    /// Accept connections until `shutdown` resolves
    ///
    /// Afterwards no new connection is accepted and open ones get
    /// [`SHUTDOWN_GRACE`] to finish.
    pub async fn serve_until<F>(self, shutdown: F) -> crate::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            accept_connection(
                                stream,
                                peer_addr,
                                &self.state,
                                &self.active_connections,
                            );
                        }
                        Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                    }
                }
                () = &mut shutdown => break,
            }
        }

        drop(self.listener);
        logger::log_shutdown(self.active_connections.load(Ordering::SeqCst));

        let deadline = tokio::time::Instant::now() + SHUTDOWN_GRACE;
        while self.active_connections.load(Ordering::SeqCst) > 0
            && tokio::time::Instant::now() < deadline
        {
            tokio::time::sleep(DRAIN_POLL).await;
        }
        Ok(())
    }
}
