//! Server-side file storage
//!
//! Receives upload bodies into the server root and streams files out of it.
//! Uploads land in a temporary file that is renamed into place only once
//! the body is complete.

use log::{error, info, warn};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::{File, OpenOptions, remove_file, rename};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::protocol::Connection;
use crate::protocol::responses::{ACTION_ABORTED, ready_marker, transfer_complete};
use crate::server::config::ServerConfig;
use crate::transfer::{create_unique_file, unique_file_name};

static UPLOAD_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Reduces a requested name to a single plain path element.
///
/// Returns `None` for names that would leave the server root or name no file.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let mut components = Path::new(name.trim()).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(file)), None) => Some(file.to_string_lossy().into_owned()),
        _ => None,
    }
}

/// Handles `PUT <name>` after the request line has been read.
///
/// The body has no length on the wire; it ends when the client stays silent
/// for the configured idle timeout or closes the stream. Each upload writes
/// to its own temporary file and claims its final name only once the body
/// is complete. Connection errors are returned and end the session; local
/// failures are reported to the client and the session continues.
pub async fn receive_upload<S>(
    conn: &mut Connection<S>,
    requested: &str,
    config: &ServerConfig,
) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let Some(file_name) = sanitize_file_name(requested) else {
        warn!("Rejected upload name {:?}", requested);
        return conn.write_all(ACTION_ABORTED.as_bytes()).await;
    };

    let root = config.server_root_path();
    if let Err(e) = unique_file_name(&root, &file_name).await {
        warn!("Cannot store {:?}: {}", file_name, e);
        return conn.write_all(ACTION_ABORTED.as_bytes()).await;
    }

    let (mut temp_file, temp_path) = match create_temp_file(&root).await {
        Ok(created) => created,
        Err(e) => {
            error!("Failed to create temporary file in {}: {}", root.display(), e);
            return conn.write_all(ACTION_ABORTED.as_bytes()).await;
        }
    };

    conn.write_all(ready_marker(requested).as_bytes()).await?;
    info!("Receiving {} into {}", requested, temp_path.display());

    let mut buffer = vec![0u8; config.buffer_size];
    let mut total_bytes_received = 0u64;
    let mut write_failed = false;

    loop {
        let n = match timeout(config.upload_idle_timeout(), conn.read_chunk(&mut buffer)).await {
            Err(_) => break, // idle: body complete
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                error!("Upload of {} interrupted: {}", requested, e);
                drop(temp_file);
                discard(&temp_path).await;
                return Err(e);
            }
        };
        total_bytes_received += n as u64;

        // Keep draining after a local failure so the stream stays in step.
        if !write_failed {
            if let Err(e) = temp_file.write_all(&buffer[..n]).await {
                error!("Failed to write {}: {}", temp_path.display(), e);
                write_failed = true;
            }
        }
    }

    let stored = if write_failed {
        drop(temp_file);
        None
    } else {
        commit(temp_file, &temp_path, &root, &file_name).await
    };

    let Some(final_path) = stored else {
        discard(&temp_path).await;
        return conn.write_all(ACTION_ABORTED.as_bytes()).await;
    };

    info!(
        "Stored {} ({} bytes)",
        final_path.display(),
        total_bytes_received
    );
    conn.write_all(transfer_complete(total_bytes_received).as_bytes())
        .await
}

async fn create_temp_file(root: &Path) -> std::io::Result<(File, PathBuf)> {
    loop {
        let sequence = UPLOAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let path = root.join(format!(
            ".gftp-upload-{}-{}.part",
            std::process::id(),
            sequence
        ));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Moves a finished upload to the first free name for `file_name`.
///
/// The name is claimed with an empty file first, so a concurrent upload of
/// the same name lands under the next free name instead.
async fn commit(
    mut temp_file: File,
    temp_path: &Path,
    root: &Path,
    file_name: &str,
) -> Option<PathBuf> {
    if let Err(e) = temp_file.flush().await {
        error!("Failed to flush {}: {}", temp_path.display(), e);
        return None;
    }
    drop(temp_file);

    let final_path = match create_unique_file(root, file_name).await {
        Ok((placeholder, path)) => {
            drop(placeholder);
            path
        }
        Err(e) => {
            error!("Failed to claim a name for {}: {}", file_name, e);
            return None;
        }
    };

    match rename(temp_path, &final_path).await {
        Ok(()) => Some(final_path),
        Err(e) => {
            error!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            );
            discard(&final_path).await;
            None
        }
    }
}

async fn discard(path: &Path) {
    if let Err(e) = remove_file(path).await {
        warn!("Failed to remove {}: {}", path.display(), e);
    }
}

/// Handles `GET <name>`: size prefix then exactly that many bytes.
///
/// A file that cannot be served is announced as an empty body, since the
/// wire has no error reply for downloads.
pub async fn send_download<S>(
    conn: &mut Connection<S>,
    requested: &str,
    config: &ServerConfig,
) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let opened = match sanitize_file_name(requested) {
        Some(name) => open_regular_file(&config.server_root_path().join(name)).await,
        None => Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "invalid file name",
        )),
    };

    let (file, size) = match opened {
        Ok(opened) => opened,
        Err(e) => {
            warn!("Cannot serve {:?}: {}; sending empty body", requested, e);
            return conn.write_size_prefix(0).await;
        }
    };

    conn.write_size_prefix(size).await?;
    let sent = tokio::io::copy(&mut file.take(size), conn.writer()).await?;
    conn.writer().flush().await?;

    if sent < size {
        // The announced length can no longer be honoured.
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("{} shrank during transfer", requested),
        ));
    }

    info!("Sent {} ({} bytes)", requested, sent);
    Ok(())
}

async fn open_regular_file(path: &Path) -> std::io::Result<(File, u64)> {
    let file = File::open(path).await?;
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    Ok((file, metadata.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::decode_size;
    use tempfile::TempDir;
    use tokio::io::duplex;

    fn config_for(dir: &TempDir) -> ServerConfig {
        ServerConfig {
            server_root: dir.path().to_string_lossy().into_owned(),
            upload_idle_timeout_ms: 100,
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("report.csv"), Some("report.csv".into()));
        assert_eq!(sanitize_file_name(" spaced.txt "), Some("spaced.txt".into()));
        assert_eq!(sanitize_file_name("../etc/passwd"), None);
        assert_eq!(sanitize_file_name("/etc/passwd"), None);
        assert_eq!(sanitize_file_name("dir/file"), None);
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name(""), None);
    }

    #[tokio::test]
    async fn test_receive_upload_until_idle() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let (server, client) = duplex(4096);
        let mut conn = Connection::new(server);

        let peer = tokio::spawn(async move {
            let mut peer = Connection::new(client);
            let marker = peer.read_response().await.unwrap();
            peer.write_all(b"line one\nline two\n").await.unwrap();
            let done = peer.read_response().await.unwrap();
            (marker, done)
        });

        receive_upload(&mut conn, "notes.txt", &config).await.unwrap();
        let (marker, done) = peer.await.unwrap();

        assert_eq!(marker, "Ready to receive file notes.txt...\r\n");
        assert_eq!(done, "226 Transfer complete (18 bytes)\r\n");
        assert_eq!(
            std::fs::read(dir.path().join("notes.txt")).unwrap(),
            b"line one\nline two\n"
        );
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["notes.txt"]);
    }

    #[tokio::test]
    async fn test_receive_upload_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"older").unwrap();
        let config = config_for(&dir);
        let (server, client) = duplex(4096);
        let mut conn = Connection::new(server);

        let peer = tokio::spawn(async move {
            let mut peer = Connection::new(client);
            peer.read_response().await.unwrap();
            peer.write_all(b"newer").await.unwrap();
            peer.read_response().await.unwrap()
        });

        receive_upload(&mut conn, "notes.txt", &config).await.unwrap();
        assert_eq!(peer.await.unwrap(), "226 Transfer complete (5 bytes)\r\n");
        assert_eq!(std::fs::read(dir.path().join("notes.txt")).unwrap(), b"older");
        assert_eq!(std::fs::read(dir.path().join("notes-1.txt")).unwrap(), b"newer");
    }

    #[tokio::test]
    async fn test_receive_upload_refuses_overlong_name() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let (server, client) = duplex(4096);
        let mut conn = Connection::new(server);
        let name = format!("{}.bin", "x".repeat(300));

        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            receive_upload(&mut conn, &name, &config),
        )
        .await
        .unwrap()
        .unwrap();

        let mut peer = Connection::new(client);
        assert_eq!(peer.read_response().await.unwrap(), ACTION_ABORTED);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_receive_upload_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let (server, client) = duplex(4096);
        let mut conn = Connection::new(server);

        receive_upload(&mut conn, "../escape.txt", &config)
            .await
            .unwrap();

        let mut peer = Connection::new(client);
        assert_eq!(peer.read_response().await.unwrap(), ACTION_ABORTED);
    }

    #[tokio::test]
    async fn test_send_download_prefix_and_body() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("data.bin"), b"0123456789").unwrap();
        let config = config_for(&dir);
        let (server, client) = duplex(4096);
        let mut conn = Connection::new(server);

        send_download(&mut conn, "data.bin", &config).await.unwrap();
        drop(conn);

        let mut peer = Connection::new(client);
        assert_eq!(peer.read_size_prefix().await.unwrap(), 10);
        let mut body = Vec::new();
        peer.body(u64::MAX).read_to_end(&mut body).await.unwrap();
        assert_eq!(body, b"0123456789");
    }

    #[tokio::test]
    async fn test_send_download_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let (server, mut client) = duplex(4096);
        let mut conn = Connection::new(server);

        send_download(&mut conn, "absent.txt", &config).await.unwrap();
        drop(conn);

        let mut wire = Vec::new();
        client.read_to_end(&mut wire).await.unwrap();
        assert_eq!(wire.len(), 8);
        assert_eq!(decode_size(wire.try_into().unwrap()), 0);
    }
}
