//! Module `connection`
//!
//! An owned, buffered transport stream with the line and frame primitives
//! both ends of the protocol are built from.

use log::debug;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, Take,
};

use crate::protocol::framing;
use crate::protocol::responses::terminate;

/// A bidirectional byte stream owned by exactly one session.
///
/// Reads go through a buffer; bytes buffered past a frame boundary stay in
/// the buffer for the next read.
pub struct Connection<S> {
    stream: BufReader<S>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufReader::new(stream),
        }
    }

    /// Writes `line`, appending `\r\n` if it is not already terminated.
    pub async fn send_line(&mut self, line: &str) -> std::io::Result<()> {
        let line = terminate(line);
        debug!("-> {:?}", line);
        self.write_all(line.as_bytes()).await
    }

    pub async fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let writer = self.stream.get_mut();
        writer.write_all(bytes).await?;
        writer.flush().await
    }

    /// Reads one response line, terminator included.
    ///
    /// A closed stream is reported as `UnexpectedEof`.
    pub async fn read_response(&mut self) -> std::io::Result<String> {
        let mut line = Vec::new();
        let n = self.stream.read_until(b'\n', &mut line).await?;
        if n == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed by peer",
            ));
        }
        let line = String::from_utf8_lossy(&line).into_owned();
        debug!("<- {:?}", line);
        Ok(line)
    }

    /// Like `read_response` but maps a closed stream to `None`.
    pub async fn read_request(&mut self) -> std::io::Result<Option<String>> {
        match self.read_response().await {
            Ok(line) => Ok(Some(line)),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn read_size_prefix(&mut self) -> std::io::Result<u64> {
        framing::read_size_prefix(&mut self.stream).await
    }

    pub async fn write_size_prefix(&mut self, size: u64) -> std::io::Result<()> {
        framing::write_size_prefix(self.stream.get_mut(), size).await
    }

    /// A reader yielding at most `len` bytes of the stream and nothing past them.
    pub fn body(&mut self, len: u64) -> Take<&mut BufReader<S>> {
        (&mut self.stream).take(len)
    }

    /// Reads whatever is available, buffered bytes first. Returns 0 at end of stream.
    pub async fn read_chunk(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stream.read(buf).await
    }

    /// Raw writer half, for streaming file bodies.
    pub fn writer(&mut self) -> &mut S {
        self.stream.get_mut()
    }

    /// Shuts the write side down. Consumes the connection so it happens once.
    pub async fn shutdown(mut self) -> std::io::Result<()> {
        self.stream.get_mut().shutdown().await
    }
}
