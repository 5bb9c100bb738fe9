//! Peer session
//!
//! Serves one client connection: greeting, USER/PASS login, then PUT, GET,
//! NOOP and QUIT until the client leaves.

use log::{info, warn};
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::protocol::responses::{
    AUTH_SUCCESS, BAD_SEQUENCE, GOODBYE, GREETING, LOGIN_REQUIRED, NEED_PASSWORD, NOT_LOGGED_IN,
    OK, UNKNOWN_COMMAND,
};
use crate::protocol::{Connection, Request, parse_request};
use crate::server::config::ServerConfig;
use crate::server::storage::{receive_upload, send_download};

/// Runs the server side of one connection and closes it once on return.
pub async fn handle_client<S>(
    stream: S,
    client_addr: SocketAddr,
    config: &ServerConfig,
) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut conn = Connection::new(stream);

    let result = async {
        conn.write_all(GREETING.as_bytes()).await?;
        if authenticate(&mut conn, client_addr, config).await? {
            serve(&mut conn, client_addr, config).await?;
        }
        Ok::<(), std::io::Error>(())
    }
    .await;

    if let Err(e) = conn.shutdown().await {
        warn!("Failed to shut down connection to {}: {}", client_addr, e);
    }
    info!("Client {} disconnected", client_addr);
    result
}

/// Returns `true` once the client has logged in, `false` if it left first.
async fn authenticate<S>(
    conn: &mut Connection<S>,
    client_addr: SocketAddr,
    config: &ServerConfig,
) -> std::io::Result<bool>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut pending_user: Option<String> = None;

    loop {
        let Some(line) = conn.read_request().await? else {
            info!("Client {} disconnected during authentication", client_addr);
            return Ok(false);
        };

        let reply = match parse_request(&line) {
            Request::User(username) => {
                pending_user = Some(username);
                NEED_PASSWORD
            }
            Request::Pass(password) => match pending_user.take() {
                Some(username) if username == config.username && password == config.password => {
                    conn.write_all(AUTH_SUCCESS.as_bytes()).await?;
                    info!("Authenticated client {} as {}", client_addr, username);
                    return Ok(true);
                }
                Some(username) => {
                    warn!("Failed login for {} from {}", username, client_addr);
                    NOT_LOGGED_IN
                }
                None => BAD_SEQUENCE,
            },
            Request::Quit => {
                conn.write_all(GOODBYE.as_bytes()).await?;
                return Ok(false);
            }
            _ => LOGIN_REQUIRED,
        };
        conn.write_all(reply.as_bytes()).await?;
    }
}

async fn serve<S>(
    conn: &mut Connection<S>,
    client_addr: SocketAddr,
    config: &ServerConfig,
) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let Some(line) = conn.read_request().await? else {
            info!("Connection closed by client {}", client_addr);
            return Ok(());
        };

        let request = parse_request(&line);
        info!("Received from {}: {:?}", client_addr, request);

        match request {
            Request::Put(name) => receive_upload(conn, &name, config).await?,
            Request::Get(name) => send_download(conn, &name, config).await?,
            Request::Noop => conn.write_all(OK.as_bytes()).await?,
            Request::Quit => {
                conn.write_all(GOODBYE.as_bytes()).await?;
                info!("Client {} requested to quit", client_addr);
                return Ok(());
            }
            Request::User(_) | Request::Pass(_) => conn.write_all(BAD_SEQUENCE.as_bytes()).await?,
            Request::Unknown(_) => conn.write_all(UNKNOWN_COMMAND.as_bytes()).await?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    fn addr() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_login_and_quit() {
        let (server, client) = duplex(4096);
        let handler = tokio::spawn(async move {
            handle_client(server, addr(), &ServerConfig::default()).await
        });

        let mut peer = Connection::new(client);
        assert_eq!(peer.read_response().await.unwrap(), GREETING);

        peer.send_line("PASS early").await.unwrap();
        assert_eq!(peer.read_response().await.unwrap(), BAD_SEQUENCE);

        peer.send_line("LIST").await.unwrap();
        assert_eq!(peer.read_response().await.unwrap(), LOGIN_REQUIRED);

        peer.send_line("USER gftp").await.unwrap();
        assert_eq!(peer.read_response().await.unwrap(), NEED_PASSWORD);
        peer.send_line("PASS wrong").await.unwrap();
        assert_eq!(peer.read_response().await.unwrap(), NOT_LOGGED_IN);

        peer.send_line("USER gftp").await.unwrap();
        peer.read_response().await.unwrap();
        peer.send_line("PASS gftp").await.unwrap();
        assert_eq!(peer.read_response().await.unwrap(), AUTH_SUCCESS);

        peer.send_line("NOOP").await.unwrap();
        assert_eq!(peer.read_response().await.unwrap(), OK);
        peer.send_line("LIST").await.unwrap();
        assert_eq!(peer.read_response().await.unwrap(), UNKNOWN_COMMAND);

        peer.send_line("QUIT").await.unwrap();
        assert_eq!(peer.read_response().await.unwrap(), GOODBYE);
        assert_eq!(peer.read_request().await.unwrap(), None);

        handler.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_disconnect_during_login() {
        let (server, client) = duplex(4096);
        let handler = tokio::spawn(async move {
            handle_client(server, addr(), &ServerConfig::default()).await
        });

        let mut peer = Connection::new(client);
        peer.read_response().await.unwrap();
        drop(peer);

        handler.await.unwrap().unwrap();
    }
}
