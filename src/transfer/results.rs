//! Transfer result types
//!
//! Defines the record returned by a completed transfer.

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    Upload,
    Download,
}

/// Outcome of one completed upload or download.
#[derive(Debug, Clone)]
pub struct TransferReport {
    pub direction: TransferDirection,
    /// Name as it appeared on the wire.
    pub file_name: String,
    /// Size announced by the peer; downloads only.
    pub expected_size: Option<u64>,
    pub bytes: u64,
    /// Where the bytes were written locally; downloads only.
    pub local_path: Option<PathBuf>,
    /// The peer's closing line; uploads only.
    pub peer_response: Option<String>,
}
