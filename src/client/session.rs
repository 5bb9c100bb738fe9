//! Client session
//!
//! Owns one connection for its whole lifetime: runs the authentication
//! exchange, then reads operator commands and dispatches them until QUIT,
//! a fatal error, or the end of operator input.

use log::{debug, error, info, warn};
use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite};

use crate::client::config::SessionOptions;
use crate::client::operator::Operator;
use crate::client::state::AuthState;
use crate::error::{AuthFailure, ClientError, handle_error};
use crate::protocol::responses::AUTH_SUCCESS;
use crate::protocol::{Command, Connection, parse_command};
use crate::transfer::{download, upload};

pub struct Session<S, I, O> {
    conn: Connection<S>,
    operator: Operator<I, O>,
    state: AuthState,
    options: SessionOptions,
}

impl<S, I, O> Session<S, I, O>
where
    S: AsyncRead + AsyncWrite + Unpin,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    /// Takes ownership of `stream`; it is closed when `run` returns.
    pub fn new(stream: S, operator: Operator<I, O>, options: SessionOptions) -> Self {
        Self {
            conn: Connection::new(stream),
            operator,
            state: AuthState::default(),
            options,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Runs the session to completion and closes the connection.
    pub async fn run(mut self) -> Result<(), ClientError> {
        let result = self.drive().await;
        match &result {
            Ok(()) => info!("Session finished"),
            Err(e) => error!("Session terminated: {}", e),
        }

        if let Err(e) = self.conn.shutdown().await {
            debug!("Connection shutdown: {}", e);
        }
        result
    }

    async fn drive(&mut self) -> Result<(), ClientError> {
        self.authenticate().await?;
        self.command_loop().await
    }

    /// Relays peer lines to the operator and operator replies to the peer
    /// until the peer sends the login marker.
    async fn authenticate(&mut self) -> Result<(), ClientError> {
        let mut answered: u32 = 0;

        loop {
            let line = match self.conn.read_response().await {
                Ok(line) => line,
                Err(e) => {
                    self.operator
                        .status(&format!("Authentication Error: {}\n", e))
                        .await;
                    return Err(ClientError::Authentication(AuthFailure::Io(e)));
                }
            };
            self.operator.status(&line).await;

            if line == AUTH_SUCCESS {
                self.state = AuthState::Authenticated;
                info!("Authenticated after {} replies", answered);
                return Ok(());
            }

            if let Some(max) = self.options.max_auth_attempts {
                if answered >= max {
                    let err = ClientError::Authentication(AuthFailure::AttemptsExhausted(max));
                    self.operator.status(&handle_error(&err)).await;
                    return Err(err);
                }
            }

            let reply = match self.operator.read_line().await {
                Ok(Some(reply)) => reply,
                Ok(None) => {
                    return Err(ClientError::Authentication(
                        AuthFailure::OperatorInputClosed,
                    ));
                }
                Err(e) => {
                    warn!("Failed to read operator input: {}", e);
                    return Err(ClientError::Authentication(
                        AuthFailure::OperatorInputClosed,
                    ));
                }
            };
            answered += 1;

            self.conn
                .send_line(&reply)
                .await
                .map_err(|e| ClientError::Authentication(AuthFailure::Io(e)))?;
        }
    }

    async fn command_loop(&mut self) -> Result<(), ClientError> {
        loop {
            self.operator.prompt().await;
            let line = match self.operator.read_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    info!("Operator input closed");
                    return Ok(());
                }
                Err(e) => {
                    error!("Failed to read operator input: {}", e);
                    self.operator.status("500 Internal server error.\r\n").await;
                    return Ok(());
                }
            };

            let command = parse_command(&line);
            debug!("Dispatching {:?}", command);

            match command {
                Command::Put(path) => {
                    if let Err(e) = upload(&mut self.conn, &path, self.operator.output()).await {
                        self.operator.status(&handle_error(&e)).await;
                    }
                }
                Command::Get(name) => {
                    let dest_dir = &self.options.download_dir;
                    if let Err(e) =
                        download(&mut self.conn, &name, dest_dir, self.operator.output()).await
                    {
                        warn!("Download of {} aborted: {}", name, e);
                    }
                }
                Command::Quit => {
                    self.operator.status("221 Goodbye.\r\n").await;
                    if let Err(e) = self.conn.send_line("QUIT").await {
                        debug!("Failed to send QUIT: {}", e);
                    }
                    return Ok(());
                }
                Command::Passthrough(line) => self.passthrough(&line).await?,
            }
        }
    }

    /// Forwards `line` and prints the single response line it gets back.
    async fn passthrough(&mut self, line: &str) -> Result<(), ClientError> {
        let response = match self.conn.send_line(line).await {
            Ok(()) => self.conn.read_response().await,
            Err(e) => Err(e),
        };

        match response {
            Ok(response) => {
                self.operator.say(&format!("GFTP>\n{}\r\n", response)).await;
                Ok(())
            }
            Err(e) => {
                self.operator
                    .status(&format!("Error reading server response: {}\r\n", e))
                    .await;
                Err(ClientError::ProtocolRead(e))
            }
        }
    }
}
