//! Upload (PUT)
//!
//! Streams a local file to the peer after a textual handshake.

use log::{info, warn};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::error::ClientError;
use crate::protocol::Connection;
use crate::protocol::responses::{put_request, ready_marker};
use crate::transfer::results::{TransferDirection, TransferReport};
use crate::utils::output::emit;

/// Uploads the file at `local_path` under its base name.
///
/// The ready marker must match byte for byte before any file byte is sent.
/// Once streaming has started a failure leaves the peer mid-transfer; the
/// protocol has no cancel message.
pub async fn upload<S, W>(
    conn: &mut Connection<S>,
    local_path: &str,
    out: &mut W,
) -> Result<TransferReport, ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut file = File::open(local_path)
        .await
        .map_err(|e| ClientError::local_file(local_path, e))?;

    let file_name = Path::new(local_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ClientError::local_file(
                local_path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;

    info!("Starting upload: {} as {}", local_path, file_name);
    conn.send_line(&put_request(&file_name))
        .await
        .map_err(ClientError::Transfer)?;

    let response = conn.read_response().await.map_err(ClientError::Transfer)?;
    let expected = ready_marker(&file_name);
    if response != expected {
        warn!("Peer refused upload of {}: {:?}", file_name, response);
        return Err(ClientError::UnexpectedResponse {
            expected,
            received: response,
        });
    }

    let bytes = tokio::io::copy(&mut file, conn.writer())
        .await
        .map_err(ClientError::Transfer)?;
    conn.writer().flush().await.map_err(ClientError::Transfer)?;
    drop(file);

    let peer_response = conn.read_response().await.map_err(ClientError::Transfer)?;
    emit(out, &format!("Server response: {}\n", peer_response)).await;
    info!("Upload of {} finished ({} bytes sent)", file_name, bytes);

    Ok(TransferReport {
        direction: TransferDirection::Upload,
        file_name,
        expected_size: None,
        bytes,
        local_path: None,
        peer_response: Some(peer_response),
    })
}
