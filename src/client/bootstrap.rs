//! Client bootstrap
//!
//! Command-line parsing and the single connection attempt a client makes.

use log::info;
use tokio::net::TcpStream;

use crate::error::ClientError;

pub const USAGE: &str = "Usage: gftp <host> <port>";

/// Extracts `<host> <port>` from the full argument list, program name included.
pub fn parse_args(args: &[String]) -> Option<(String, u16)> {
    match args {
        [_, host, port] => {
            let port = port.parse::<u16>().ok()?;
            Some((host.clone(), port))
        }
        _ => None,
    }
}

/// Opens one TCP connection to `host:port`. No retries.
pub async fn connect(host: &str, port: u16) -> Result<TcpStream, ClientError> {
    let addr = format!("{}:{}", host, port);
    match TcpStream::connect((host, port)).await {
        Ok(stream) => {
            info!("Connected to {}", addr);
            Ok(stream)
        }
        Err(source) => Err(ClientError::Connect { addr, source }),
    }
}
