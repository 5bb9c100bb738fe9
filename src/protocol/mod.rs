//! GFTP wire protocol
//!
//! Command classification, fixed response texts, download framing and the
//! buffered connection both ends speak through.

pub mod commands;
pub mod connection;
pub mod framing;
pub mod responses;

pub use commands::{Command, Request, parse_command, parse_request};
pub use connection::Connection;
pub use framing::{decode_size, encode_size, read_size_prefix, write_size_prefix};
