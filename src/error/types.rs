//! Error types
//!
//! Defines the error taxonomy for the client session, the transfer engine
//! and the serving side.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised by the client: bootstrap, session and transfer engine.
#[derive(Debug)]
pub enum ClientError {
    /// The transport connection could not be established.
    Connect { addr: String, source: io::Error },
    Authentication(AuthFailure),
    /// Opening, creating or preparing a local file or directory failed.
    LocalFile { path: PathBuf, source: io::Error },
    /// The peer answered the upload handshake with something other than the ready marker.
    UnexpectedResponse { expected: String, received: String },
    /// I/O failure while moving file bytes.
    Transfer(io::Error),
    /// A command-loop read of the connection failed.
    ProtocolRead(io::Error),
}

/// Why the authentication phase ended without success.
#[derive(Debug)]
pub enum AuthFailure {
    Io(io::Error),
    OperatorInputClosed,
    AttemptsExhausted(u32),
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailure::Io(e) => write!(f, "{}", e),
            AuthFailure::OperatorInputClosed => write!(f, "operator input closed"),
            AuthFailure::AttemptsExhausted(n) => {
                write!(f, "gave up after {} attempts", n)
            }
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Connect { addr, source } => {
                write!(f, "Error connecting to {}: {}", addr, source)
            }
            ClientError::Authentication(e) => write!(f, "Authentication error: {}", e),
            ClientError::LocalFile { path, source } => {
                write!(f, "Local file error on {}: {}", path.display(), source)
            }
            ClientError::UnexpectedResponse { received, .. } => {
                write!(f, "Unexpected server response: {}", received.trim_end())
            }
            ClientError::Transfer(e) => write!(f, "Transfer failed: {}", e),
            ClientError::ProtocolRead(e) => write!(f, "Error reading server response: {}", e),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Connect { source, .. } | ClientError::LocalFile { source, .. } => {
                Some(source)
            }
            ClientError::Authentication(AuthFailure::Io(e))
            | ClientError::Transfer(e)
            | ClientError::ProtocolRead(e) => Some(e),
            _ => None,
        }
    }
}

impl ClientError {
    pub fn local_file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ClientError::LocalFile {
            path: path.into(),
            source,
        }
    }

    /// Session-scoped errors end the command loop; the rest only abort one transfer.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ClientError::Connect { .. }
                | ClientError::Authentication(_)
                | ClientError::ProtocolRead(_)
        )
    }
}

/// Errors raised while starting or running the server.
#[derive(Debug)]
pub enum ServerError {
    Config(config::ConfigError),
    Bind { addr: String, source: io::Error },
    IoError(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::Bind { addr, source } => {
                write!(f, "Failed to bind to {}: {}", addr, source)
            }
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}
