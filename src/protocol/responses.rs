//! Protocol response lines
//!
//! Fixed wire texts and the formatters for the parameterised ones.

/// Sent by the server once the credentials are accepted.
pub const AUTH_SUCCESS: &str = "230 User logged in, proceed.\r\n";

pub const GREETING: &str = "220 Welcome to GFTP server\r\n";
pub const NEED_PASSWORD: &str = "331 User name okay, need password.\r\n";
pub const NOT_LOGGED_IN: &str = "530 Not logged in.\r\n";
pub const LOGIN_REQUIRED: &str = "530 Please login with USER and PASS.\r\n";
pub const BAD_SEQUENCE: &str = "503 Bad sequence of commands.\r\n";
pub const OK: &str = "200 OK\r\n";
pub const GOODBYE: &str = "221 Goodbye.\r\n";
pub const UNKNOWN_COMMAND: &str = "500 Unknown command.\r\n";
pub const ACTION_ABORTED: &str = "451 Requested action aborted.\r\n";
pub const TOO_MANY_CONNECTIONS: &str = "421 Too many connections. Try again later.\r\n";

/// Line terminator appended to every request.
pub const CRLF: &str = "\r\n";

/// The exact text a peer sends before accepting an upload of `name`.
pub fn ready_marker(name: &str) -> String {
    format!("Ready to receive file {}...\r\n", name)
}

/// Request line for an upload of `name`.
pub fn put_request(name: &str) -> String {
    format!("PUT {}\r\n", name)
}

/// Request line for a download of `name`.
pub fn get_request(name: &str) -> String {
    format!("GET {}\r\n", name)
}

pub fn transfer_complete(bytes: u64) -> String {
    format!("226 Transfer complete ({} bytes)\r\n", bytes)
}

/// Appends the line terminator unless the line already ends with it.
pub fn terminate(line: &str) -> String {
    if line.ends_with(CRLF) {
        line.to_string()
    } else {
        format!("{}{}", line, CRLF)
    }
}
