//! Incremental line splitting over a byte stream.
//!
//! The reader keeps whatever it has read past the last delimiter and serves
//! the next line from it before touching the stream again.

use std::io;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Consecutive zero-byte reads tolerated before the stream counts as ended.
pub const MAX_EMPTY_READS: usize = 16;

/// Capacity reserved in the tail buffer before each read.
pub const READ_CHUNK: usize = 4096;

/// Terminal error of a [`LineReader`].
///
/// Cloneable so the same error can be handed out on every call once the
/// stream has ended.
#[derive(Debug, Clone, Error)]
pub enum LineError {
    /// The stream ended before producing any bytes.
    #[error("no data")]
    NoData,
    /// The underlying read failed.
    #[error("read failed: {0}")]
    Io(Arc<io::Error>),
}

#[derive(Debug)]
enum ReaderState {
    Streaming,
    Drained(LineError),
}

/// Splits a byte stream into LF (or CRLF) terminated lines.
pub struct LineReader<R> {
    stream: R,
    tail: BytesMut,
    state: ReaderState,
}

impl<R> LineReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(stream: R) -> Self {
        Self {
            stream,
            tail: BytesMut::new(),
            state: ReaderState::Streaming,
        }
    }

    /// Returns the next line without its terminator.
    ///
    /// An explicitly delimited empty line is `Ok` with an empty slice. Once
    /// the stream has ended, any buffered bytes are returned as one final
    /// line and every later call yields the same terminal error.
    pub async fn read_line(&mut self) -> Result<Bytes, LineError> {
        if let Some(pos) = find_lf(&self.tail) {
            return Ok(self.take_line(pos));
        }

        if let ReaderState::Drained(_) = self.state {
            return self.finish();
        }

        let mut budget = MAX_EMPTY_READS;
        while budget > 0 {
            let start = self.tail.len();
            self.tail.reserve(READ_CHUNK);

            match self.stream.read_buf(&mut self.tail).await {
                Ok(0) => budget -= 1,
                Ok(_) => {
                    budget = MAX_EMPTY_READS;
                    if let Some(pos) = find_lf(&self.tail[start..]) {
                        return Ok(self.take_line(start + pos));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => budget -= 1,
                Err(e) => {
                    self.state = ReaderState::Drained(LineError::Io(Arc::new(e)));
                    break;
                }
            }
        }

        if let ReaderState::Streaming = self.state {
            self.state = ReaderState::Drained(LineError::NoData);
        }
        self.finish()
    }

    /// Bytes read from the stream but not yet returned as part of a line.
    pub fn buffered(&self) -> &[u8] {
        &self.tail
    }

    pub fn into_inner(self) -> R {
        self.stream
    }

    fn take_line(&mut self, pos: usize) -> Bytes {
        let mut line = self.tail.split_to(pos + 1);
        line.truncate(pos);
        if line.last() == Some(&b'\r') {
            line.truncate(pos - 1);
        }
        line.freeze()
    }

    /// Flushes the tail as a final line, or reports the terminal error.
    fn finish(&mut self) -> Result<Bytes, LineError> {
        if !self.tail.is_empty() {
            return Ok(self.tail.split().freeze());
        }
        match &self.state {
            ReaderState::Drained(err) => Err(err.clone()),
            ReaderState::Streaming => Err(LineError::NoData),
        }
    }
}

fn find_lf(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n')
}
