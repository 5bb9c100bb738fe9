//! Download (GET)
//!
//! Requests a remote file and writes exactly the announced number of bytes
//! into a fresh local file.

use log::{error, info};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::error::ClientError;
use crate::protocol::Connection;
use crate::protocol::responses::get_request;
use crate::transfer::naming::create_unique_file;
use crate::transfer::results::{TransferDirection, TransferReport};
use crate::utils::output::status;

const LOCAL_ERROR: &str = "451 Requested action aborted: local error in processing.\r\n";
const TRANSFER_FAILED: &str = "426 Transfer failed.\r\n";

/// Downloads `remote_name` into `dest_dir` and reports progress to `out`.
///
/// Every failure is shown to the operator here before it is returned.
/// Bytes already written stay on disk when the transfer fails. `remote_name`
/// is joined onto `dest_dir` as received.
pub async fn download<S, W>(
    conn: &mut Connection<S>,
    remote_name: &str,
    dest_dir: &Path,
    out: &mut W,
) -> Result<TransferReport, ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    if remote_name.is_empty() {
        status(out, LOCAL_ERROR).await;
        return Err(ClientError::local_file(
            dest_dir,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name given"),
        ));
    }

    if let Err(e) = tokio::fs::create_dir_all(dest_dir).await {
        status(out, &format!("Error creating directory: {}\n", e)).await;
        return Err(ClientError::local_file(dest_dir, e));
    }

    let (mut file, local_path) = match create_unique_file(dest_dir, remote_name).await {
        Ok(created) => created,
        Err(e) => {
            error!("Failed to create local file for {}: {}", remote_name, e);
            status(out, LOCAL_ERROR).await;
            return Err(ClientError::local_file(dest_dir.join(remote_name), e));
        }
    };

    status(out, "150 Opening data connection.\r\n").await;

    if let Err(e) = conn.send_line(&get_request(remote_name)).await {
        status(out, LOCAL_ERROR).await;
        return Err(ClientError::Transfer(e));
    }

    let size = match conn.read_size_prefix().await {
        Ok(size) => size,
        Err(e) => {
            error!("Failed to read size prefix for {}: {}", remote_name, e);
            status(out, TRANSFER_FAILED).await;
            return Err(ClientError::Transfer(e));
        }
    };
    status(out, &format!("File size: {} bytes.\r\n", size)).await;

    let copied = match copy_body(conn, size, &mut file).await {
        Ok(copied) => copied,
        Err(e) => {
            error!("Download of {} failed: {}", remote_name, e);
            status(out, TRANSFER_FAILED).await;
            return Err(ClientError::Transfer(e));
        }
    };

    status(
        out,
        &format!(
            "226 Transfer complete. file path : {} \r\n",
            local_path.display()
        ),
    )
    .await;
    info!(
        "Downloaded {} to {} ({} bytes)",
        remote_name,
        local_path.display(),
        copied
    );

    Ok(TransferReport {
        direction: TransferDirection::Download,
        file_name: remote_name.to_string(),
        expected_size: Some(size),
        bytes: copied,
        local_path: Some(local_path),
        peer_response: None,
    })
}

/// Copies exactly `size` bytes; a peer closing early is `UnexpectedEof`.
async fn copy_body<S>(conn: &mut Connection<S>, size: u64, file: &mut File) -> std::io::Result<u64>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let copied = tokio::io::copy(&mut conn.body(size), file).await?;
    file.flush().await?;
    if copied < size {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("peer closed after {} of {} bytes", copied, size),
        ));
    }
    Ok(copied)
}
