//! Error handling
//!
//! Defines error types and handling for the client and the server.

pub mod handlers;
pub mod types;

pub use handlers::{error_to_status_code, handle_error};
pub use types::*;
