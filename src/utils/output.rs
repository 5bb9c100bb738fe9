//! Operator output
//!
//! Status lines shown to the operator. Output failures are logged and never
//! abort the protocol exchange they describe.

use log::warn;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Prefix of every status line and the command prompt.
pub const PROMPT: &str = "GFTP> ";

/// Writes `text` as-is and flushes.
pub async fn emit<W>(out: &mut W, text: &str)
where
    W: AsyncWrite + Unpin,
{
    let result = async {
        out.write_all(text.as_bytes()).await?;
        out.flush().await
    }
    .await;
    if let Err(e) = result {
        warn!("Failed to write to operator: {}", e);
    }
}

/// Writes `msg` behind the prompt marker.
pub async fn status<W>(out: &mut W, msg: &str)
where
    W: AsyncWrite + Unpin,
{
    emit(out, &format!("{}{}", PROMPT, msg)).await;
}
