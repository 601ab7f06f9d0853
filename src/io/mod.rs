//! Line-oriented message channel to the match wrapper.
//!
//! The wrapper is the external process that launched this engine. All
//! communication with it goes through a single [`Channel`]: one line of text
//! per message, command token first, arguments after.
//!
//! The wrapper is a trusted, cooperating peer. Reads block without timeout,
//! and lines that arrive while waiting for a specific message are discarded
//! with a log entry rather than treated as errors.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::path::Path;

use thiserror::Error;
use tracing::warn;

/// Transport errors on the wrapper channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The peer closed the stream while a message was still expected.
    #[error("channel closed by peer")]
    Closed,

    /// Underlying read or write failure.
    #[error("channel transport error: {0}")]
    Io(#[from] io::Error),
}

/// Duplex line channel to the wrapper.
///
/// Generic over the endpoints so tests can run the full protocol against
/// in-memory buffers and debug mode can read from a recorded input file.
pub struct Channel<R, W> {
    reader: R,
    writer: W,
}

impl Channel<BufReader<Stdin>, Stdout> {
    /// Channel over the process's standard streams, as used in a live match.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl Channel<BufReader<File>, Stdout> {
    /// Channel that reads protocol lines from a recorded wrapper-input file.
    ///
    /// Used by file-driven debug mode. Output still goes to stdout.
    pub fn from_input_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), io::stdout()))
    }
}

impl<R: BufRead, W: Write> Channel<R, W> {
    /// Create a channel over arbitrary endpoints.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Send one message: a single line, flushed immediately.
    pub fn send(&mut self, message: &str) -> Result<(), ChannelError> {
        self.writer.write_all(message.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Block until the next line arrives and return it verbatim
    /// (without the line terminator).
    ///
    /// Returns [`ChannelError::Closed`] if the stream ends first.
    pub fn next_message(&mut self) -> Result<String, ChannelError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(ChannelError::Closed);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Block until a line equal to `expected` arrives.
    ///
    /// Every other line is logged and discarded. Only a transport failure
    /// makes this return early.
    pub fn wait_for(&mut self, expected: &str) -> Result<(), ChannelError> {
        loop {
            let line = self.next_message()?;
            if line == expected {
                return Ok(());
            }
            warn!(expected, got = %line, "discarding unexpected message");
        }
    }

    /// Consume the channel, returning its endpoints.
    ///
    /// Lets tests inspect everything that was written.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
