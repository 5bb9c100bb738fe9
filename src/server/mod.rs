//! Server core functionality
//!
//! The serving side of the protocol: listener, per-connection peer
//! session, file storage and configuration.

pub mod config;
pub mod core;
pub mod handler;
pub mod storage;

pub use config::ServerConfig;
pub use core::Server;
