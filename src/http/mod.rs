//! HTTP/1.0 protocol implementation.
//!
//! One request per connection: no keep-alive, no request bodies.
//!
//! # Architecture
//!
//! - **`line_reader`**: Splits the raw byte stream into CRLF/LF terminated lines
//! - **`parser`**: Turns the request line and header lines into a request
//! - **`request`**: HTTP request representation and accessors
//! - **`connection`**: The per-connection state machine
//! - **`response`**: Status codes and a response builder
//! - **`writer`**: Serializes and writes responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────────┐
//!        │ AwaitingRequestLine  │ ← First line: METHOD URI VERSION
//!        └──────────┬───────────┘
//!                   │ Three tokens
//!                   ▼
//!        ┌──────────────────────┐
//!        │   AwaitingHeaders    │ ← One header per non-empty line
//!        └──────────┬───────────┘
//!                   │ Empty line
//!                   ▼
//!        ┌──────────────────────┐
//!        │      Complete        │ ← Dispatch, respond, close
//!        └──────────────────────┘
//! ```
//!
//! A read error, a malformed request line or a header without a colon closes
//! the connection from any state without sending a response.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use httpgod::config::Config;
//! use httpgod::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg = Arc::new(Config::default());
//!     let listener = TcpListener::bind(cfg.listen_addr()).await?;
//!
//!     loop {
//!         let (socket, peer) = listener.accept().await?;
//!         let cfg = cfg.clone();
//!         tokio::spawn(async move {
//!             if let Err(e) = Connection::new(socket, peer, cfg).run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod line_reader;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
