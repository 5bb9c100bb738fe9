//! GFTP client - Entry Point
//!
//! Connects to a GFTP server and hands the connection to an interactive session.

use log::error;
use std::process::ExitCode;

use gftp::client::{ClientConfig, Operator, Session, USAGE, connect, parse_args};
use gftp::utils::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging("warn");

    let args: Vec<String> = std::env::args().collect();
    let Some((host, port)) = parse_args(&args) else {
        println!("{}", USAGE);
        return ExitCode::from(2);
    };

    let config = match ClientConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(1);
        }
    };

    let stream = match connect(&host, port).await {
        Ok(stream) => stream,
        Err(e) => {
            println!("{}", e);
            return ExitCode::from(1);
        }
    };

    let session = Session::new(stream, Operator::stdio(), config.session_options());
    match session.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(1)
        }
    }
}
