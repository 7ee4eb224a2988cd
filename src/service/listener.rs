//! Listener set: bind, accept, fan out.
//!
//! One TCP listener per configured port. Binding happens up front so a port
//! already in use fails the process at startup instead of surfacing later.
//! Each accept loop spawns a detached [`Session`] task per connection and
//! immediately returns to accepting; no cap is imposed on concurrent
//! connections.

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::service::session::Session;

/// The set of bound listeners for the process.
///
/// Holds the sockets only; all per-connection state lives in the sessions.
/// The set is read-only after [`ListenerSet::bind`].
#[derive(Debug)]
pub struct ListenerSet {
    listeners: Vec<TcpListener>,
}

impl ListenerSet {
    /// Bind every configured port.
    ///
    /// Any bind failure is fatal and propagates; a half-bound set is never
    /// run. Each bound address is logged once listening begins.
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        let mut listeners = Vec::with_capacity(config.ports.len());

        for port in &config.ports {
            let listener = TcpListener::bind((config.host.as_str(), *port)).await?;
            let addr = listener.local_addr()?;
            info!(address = %addr, "Server listening");
            listeners.push(listener);
        }

        Ok(Self { listeners })
    }

    /// Addresses actually bound, in configuration order.
    ///
    /// Useful when binding port 0 in tests.
    pub fn local_addrs(&self) -> Result<Vec<SocketAddr>> {
        self.listeners
            .iter()
            .map(|l| l.local_addr().map_err(Into::into))
            .collect()
    }

    /// Accept connections until CTRL+C.
    pub async fn run(self) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let signal_watcher = tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("Received CTRL+C signal, shutting down");
                let _ = shutdown_tx.send(true);
            }
        });

        let result = self.run_with_shutdown(shutdown_rx).await;

        // If the accept loops ended without a signal, the watcher is still
        // pending on ctrl_c and must not outlive this call.
        signal_watcher.abort();
        result
    }

    /// Accept connections until the shutdown channel fires.
    ///
    /// Shutdown stops the accept loops; in-flight sessions drain on their
    /// own (best effort, they are aborted when the process exits).
    pub async fn run_with_shutdown(self, shutdown: watch::Receiver<bool>) -> Result<()> {
        let mut accept_loops = JoinSet::new();

        for listener in self.listeners {
            accept_loops.spawn(accept_loop(listener, shutdown.clone()));
        }

        while let Some(joined) = accept_loops.join_next().await {
            joined?;
        }

        Ok(())
    }
}

/// Accept connections on one listener, spawning an independent session per
/// connection. Never blocks on session completion.
async fn accept_loop(listener: TcpListener, mut shutdown: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                if let Ok(addr) = listener.local_addr() {
                    info!(address = %addr, "Listener shutting down");
                }
                return;
            }

            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        tokio::spawn(handle_connection(stream, peer));
                    }
                    Err(e) => {
                        error!(error = %e, "Error accepting connection");
                    }
                }
            }
        }
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr) {
    Session::new(peer).run(stream).await;
}
