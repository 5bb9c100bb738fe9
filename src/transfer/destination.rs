//! Download destination
//!
//! Resolves the directory downloads land in from the operator's identity.

use std::path::PathBuf;

/// Used when the operator's identity cannot be determined.
pub const FALLBACK_IDENTITY: &str = "GFTPC";

/// The operator's login name, if the environment names one.
pub fn operator_identity() -> Option<String> {
    std::env::var("USER").ok().filter(|user| !user.is_empty())
}

/// `/home/<identity>/GFTP`, with the fallback identity when none is given.
pub fn resolve_download_dir(identity: Option<&str>) -> PathBuf {
    let user = identity
        .filter(|user| !user.is_empty())
        .unwrap_or(FALLBACK_IDENTITY);
    PathBuf::from("/home").join(user).join("GFTP")
}
