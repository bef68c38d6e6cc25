use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::config::Config;
use crate::handler::Dispatcher;
use crate::http::line_reader::LineReader;
use crate::http::parser::{parse_header_line, parse_request_line};
use crate::http::request::Request;

pub struct Connection<S> {
    reader: LineReader<S>,
    peer: SocketAddr,
    config: Arc<Config>,
    state: ConnectionState,
}

pub enum ConnectionState {
    AwaitingRequestLine,
    AwaitingHeaders(Request),
    Complete(Request),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, config: Arc<Config>) -> Self {
        Self {
            reader: LineReader::new(stream),
            peer,
            config,
            state: ConnectionState::AwaitingRequestLine,
        }
    }

    /// Reads one request, answers it and closes the connection.
    ///
    /// Read and parse failures end the connection without a response.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::AwaitingRequestLine => {
                    let line = self.reader.read_line().await.context("can't read")?;
                    let request = parse_request_line(&line)?;
                    info!(peer = %self.peer, "{}", String::from_utf8_lossy(&line));
                    self.state = ConnectionState::AwaitingHeaders(request);
                }

                ConnectionState::AwaitingHeaders(mut request) => {
                    let line = self.reader.read_line().await.context("can't read")?;
                    if line.is_empty() {
                        self.state = ConnectionState::Complete(request);
                    } else {
                        request.headers.push(parse_header_line(&line)?);
                        self.state = ConnectionState::AwaitingHeaders(request);
                    }
                }

                ConnectionState::Complete(request) => {
                    let mut stream = self.reader.into_inner();
                    Dispatcher::new(&self.config, self.peer)
                        .dispatch(&mut stream, &request)
                        .await?;

                    if let Err(e) = stream.shutdown().await {
                        warn!(peer = %self.peer, error = %e, "a connection is NOT closed");
                    }
                    return Ok(());
                }

                ConnectionState::Closed => return Ok(()),
            }
        }
    }
}
