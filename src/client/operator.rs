//! Operator channel
//!
//! The human side of a client session: line input and status output.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader, Stdin, Stdout};

use crate::utils::output::{PROMPT, emit, status};

pub struct Operator<I, O> {
    input: I,
    output: O,
}

impl Operator<BufReader<Stdin>, Stdout> {
    /// The process's standard input and output.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<I, O> Operator<I, O>
where
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Reads one line with surrounding whitespace removed; `None` once input is exhausted.
    pub async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line).await?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub async fn prompt(&mut self) {
        emit(&mut self.output, PROMPT).await;
    }

    /// Writes `msg` behind the prompt marker.
    pub async fn status(&mut self, msg: &str) {
        status(&mut self.output, msg).await;
    }

    pub async fn say(&mut self, text: &str) {
        emit(&mut self.output, text).await;
    }

    /// The output stream, for components that print their own progress.
    pub fn output(&mut self) -> &mut O {
        &mut self.output
    }
}
