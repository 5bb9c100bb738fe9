//! Download framing
//!
//! A download body is preceded by its length as an 8-byte little-endian
//! unsigned integer.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Width of the size prefix on the wire.
pub const SIZE_PREFIX_LEN: usize = 8;

pub fn encode_size(size: u64) -> [u8; SIZE_PREFIX_LEN] {
    size.to_le_bytes()
}

pub fn decode_size(bytes: [u8; SIZE_PREFIX_LEN]) -> u64 {
    u64::from_le_bytes(bytes)
}

/// Reads exactly one size prefix, failing with `UnexpectedEof` on a short read.
pub async fn read_size_prefix<R>(reader: &mut R) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; SIZE_PREFIX_LEN];
    reader.read_exact(&mut buf).await?;
    Ok(decode_size(buf))
}

pub async fn write_size_prefix<W>(writer: &mut W, size: u64) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&encode_size(size)).await
}
