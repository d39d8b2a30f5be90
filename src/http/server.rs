use anyhow::{Context, Result};
use async_trait::async_trait;
use essentials::{debug, warn};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::{TcpListener, TcpStream};

#[async_trait]
pub trait ConnectionHandler {
    async fn handle(&self, stream: TcpStream);
}

/// Accept loop spawning one task per connection.
pub struct Server<H: ConnectionHandler + Send + Sync + 'static> {
    listener: TcpListener,
    handler: Arc<H>,
}

impl<H: ConnectionHandler + Send + Sync + 'static> Server<H> {
    pub async fn bind(addr: SocketAddr, handler: H) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to address: {}", addr))?;
        Ok(Self {
            listener,
            handler: Arc::new(handler),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to read listener address")
    }

    pub async fn run(self) -> Result<()> {
        debug!("Listening on: {:?}", self.listener.local_addr().ok());
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    warn!("Failed to accept connection: {}", err);
                    continue;
                }
            };
            debug!("Accepted connection from: {}", peer);
            let handler = self.handler.clone();
            tokio::spawn(async move {
                handler.handle(stream).await;
            });
        }
    }
}
