use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::error::ServerError;
use crate::protocol::responses::TOO_MANY_CONNECTIONS;
use crate::server::config::ServerConfig;
use crate::server::handler::handle_client;

pub struct Server {
    listener: TcpListener,
    config: Arc<ServerConfig>,
    connection_slots: Arc<Semaphore>,
}

impl Server {
    /// Binds the listener and makes sure the server root exists.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let addr = config.control_socket();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!("Server bound to {}", addr);

        if let Err(e) = tokio::fs::create_dir_all(config.server_root_path()).await {
            warn!("Failed to create server root directory: {}", e);
        } else {
            info!("Server root directory: {}", config.server_root);
        }

        Ok(Self {
            listener,
            connection_slots: Arc::new(Semaphore::new(config.max_clients)),
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, one task per connection.
    pub async fn start(&self) {
        info!(
            "Starting GFTP server on {} (max {} clients)",
            self.config.control_socket(),
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let config = Arc::clone(&self.config);
                    let connection_slots = Arc::clone(&self.connection_slots);

                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_new_client(stream, addr, connection_slots, config).await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Claims a connection slot, then runs the peer session.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    connection_slots: Arc<Semaphore>,
    config: Arc<ServerConfig>,
) -> std::io::Result<()> {
    let Ok(_slot) = connection_slots.try_acquire_owned() else {
        warn!("Refusing {}: connection limit reached", client_addr);
        stream.write_all(TOO_MANY_CONNECTIONS.as_bytes()).await?;
        return stream.shutdown().await;
    };

    info!("Client connected: {}", client_addr);
    handle_client(stream, client_addr, &config).await
}
