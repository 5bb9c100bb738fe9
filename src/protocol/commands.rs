//! Module `commands`
//!
//! Defines the command types exchanged by the two ends of a connection and
//! the pure functions that classify raw input lines into them.

/// A command typed by the operator into the client.
///
/// Classification is case-sensitive and driven by the first
/// whitespace-delimited token; anything unrecognised is forwarded verbatim.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    Put(String),         // Upload a local path
    Get(String),         // Download a remote name
    Quit,                // End the session
    Passthrough(String), // Forward the raw line to the peer
}

/// Classifies one line of operator input.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or("");
    let arg = parts.next().unwrap_or("").trim();

    match verb {
        "PUT" => Command::Put(arg.to_string()),
        "GET" => Command::Get(arg.to_string()),
        "QUIT" => Command::Quit,
        _ => Command::Passthrough(trimmed.to_string()),
    }
}

/// A request received by the server from a client.
#[derive(Debug, PartialEq, Eq)]
pub enum Request {
    User(String),
    Pass(String),
    Put(String),
    Get(String),
    Noop,
    Quit,
    Unknown(String),
}

/// Parses a raw request line received by the server.
///
/// Verbs are matched case-insensitively; `PUT`/`GET` without a name are unknown.
pub fn parse_request(raw: &str) -> Request {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or("").to_ascii_uppercase();
    let arg = parts.next().unwrap_or("").trim();

    match verb.as_str() {
        "USER" => Request::User(arg.to_string()),
        "PASS" => Request::Pass(arg.to_string()),
        "PUT" if !arg.is_empty() => Request::Put(arg.to_string()),
        "GET" if !arg.is_empty() => Request::Get(arg.to_string()),
        "NOOP" => Request::Noop,
        "QUIT" => Request::Quit,
        _ => Request::Unknown(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transfer_commands() {
        assert_eq!(
            parse_command("PUT /tmp/report.csv"),
            Command::Put("/tmp/report.csv".to_string())
        );
        assert_eq!(
            parse_command("GET photo.png\n"),
            Command::Get("photo.png".to_string())
        );
        assert_eq!(parse_command("  PUT   spaced.txt  "), Command::Put("spaced.txt".into()));
    }

    #[test]
    fn test_parse_quit() {
        assert_eq!(parse_command("QUIT"), Command::Quit);
        assert_eq!(parse_command("QUIT now"), Command::Quit);
    }

    #[test]
    fn test_classification_is_case_sensitive() {
        assert_eq!(parse_command("put a.txt"), Command::Passthrough("put a.txt".into()));
        assert_eq!(parse_command("quit"), Command::Passthrough("quit".into()));
    }

    #[test]
    fn test_first_token_decides() {
        assert_eq!(parse_command("PUTX a"), Command::Passthrough("PUTX a".into()));
        assert_eq!(parse_command("LIST"), Command::Passthrough("LIST".into()));
        assert_eq!(parse_command(""), Command::Passthrough("".into()));
    }

    #[test]
    fn test_parse_requests() {
        assert_eq!(parse_request("USER alice\r\n"), Request::User("alice".into()));
        assert_eq!(parse_request("pass secret"), Request::Pass("secret".into()));
        assert_eq!(parse_request("PUT a.txt\r\n"), Request::Put("a.txt".into()));
        assert_eq!(parse_request("GET b.bin"), Request::Get("b.bin".into()));
        assert_eq!(parse_request("NOOP"), Request::Noop);
        assert_eq!(parse_request("QUIT\r\n"), Request::Quit);
        assert_eq!(parse_request("GET"), Request::Unknown("GET".into()));
        assert_eq!(parse_request("LIST"), Request::Unknown("LIST".into()));
    }
}
