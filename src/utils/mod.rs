//! Utility functions
//!
//! Logging setup and operator output helpers.

pub mod logging;
pub mod output;
