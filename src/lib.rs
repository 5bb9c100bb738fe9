//! GFTP - a small FTP-inspired file transfer protocol over one TCP connection.
//!
//! The client half (`client`, `transfer`) drives an interactive session;
//! the server half (`server`) answers it. Both speak through `protocol`.

pub mod client;
pub mod error;
pub mod protocol;
pub mod server;
pub mod transfer;
pub mod utils;

pub use client::Session;
pub use server::Server;
