//! Error handlers
//!
//! Maps errors to protocol-flavored status codes and operator lines.

use crate::error::types::ClientError;
use log::{error, warn};

/// Convert a client error to the status code shown in front of it.
pub fn error_to_status_code(err: &ClientError) -> u16 {
    match err {
        ClientError::Connect { .. } => 421,
        ClientError::Authentication(_) => 530,
        ClientError::LocalFile { .. } => 451,
        ClientError::UnexpectedResponse { .. } => 501,
        ClientError::Transfer(_) => 426,
        ClientError::ProtocolRead(_) => 421,
    }
}

/// Log the error and render the line shown to the operator.
pub fn handle_error(err: &ClientError) -> String {
    if err.is_fatal() {
        error!("Session error: {}", err);
    } else {
        warn!("Transfer aborted: {}", err);
    }
    format!("{} {}\r\n", error_to_status_code(err), err)
}
