//! Interactive client
//!
//! Connection bootstrap, operator channel, configuration and the session
//! state machine that drives one connection.

pub mod bootstrap;
pub mod config;
pub mod operator;
pub mod session;
pub mod state;

pub use bootstrap::{USAGE, connect, parse_args};
pub use config::{ClientConfig, SessionOptions};
pub use operator::Operator;
pub use session::Session;
pub use state::AuthState;
