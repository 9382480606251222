use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::Semaphore;
use tracing::warn;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::static_files::DocumentRoot;

/// Pause after a failed accept so a persistent error (e.g. EMFILE) does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Owns the listening socket and spawns one task per accepted connection.
pub struct Listener {
    inner: TcpListener,
    root: Arc<DocumentRoot>,
    connection_limit: Option<Arc<Semaphore>>,
}

impl Listener {
    /// Binds with address reuse enabled and the configured backlog.
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        anyhow::ensure!(
            cfg.max_connections != Some(0),
            "max_connections must be at least 1"
        );

        let listen_addr = cfg.listen_addr();
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&listen_addr)
            .await
            .with_context(|| format!("resolving {}", listen_addr))?
            .collect();
        let addr = pick_bind_addr(&addrs).with_context(|| format!("no address for {}", listen_addr))?;

        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }?;
        socket.set_reuseaddr(true)?;
        socket
            .bind(addr)
            .with_context(|| format!("cannot bind {}", listen_addr))?;
        let inner = socket.listen(cfg.backlog)?;

        Ok(Self {
            inner,
            root: Arc::new(DocumentRoot::new(cfg.document_root.clone())),
            connection_limit: cfg.max_connections.map(|n| Arc::new(Semaphore::new(n))),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    pub fn document_root(&self) -> &DocumentRoot {
        &self.root
    }

    /// Accepts connections forever. Handlers are never joined.
    pub async fn serve(self) -> anyhow::Result<()> {
        loop {
            let permit = match &self.connection_limit {
                Some(limit) => Some(
                    limit
                        .clone()
                        .acquire_owned()
                        .await
                        .context("connection limit closed")?,
                ),
                None => None,
            };

            let (socket, peer) = match self.inner.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };
            tracing::debug!("Accepted connection from {}", peer);

            let root = Arc::clone(&self.root);
            tokio::spawn(async move {
                let _permit = permit;
                let mut conn = Connection::new(socket, peer, root);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {:#}", peer, e);
                }
            });
        }
    }
}

/// IPv4 first, so `localhost` stays reachable over 127.0.0.1 on dual-stack hosts.
pub fn pick_bind_addr(addrs: &[SocketAddr]) -> Option<SocketAddr> {
    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}
