//! GFTP server - Entry Point
//!
//! Serves uploads and downloads from a server root directory.

use log::{error, info};
use std::process::ExitCode;

use gftp::server::{Server, ServerConfig};
use gftp::utils::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging("info");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::from(1);
        }
    };

    info!("Launching GFTP server...");
    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(1);
        }
    };

    server.start().await;
    ExitCode::SUCCESS
}
