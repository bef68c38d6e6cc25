//! Request routing.
//!
//! The [`Dispatcher`] owns no response logic of its own: it picks one of the
//! collaborators below from the decoded URI and the filesystem entry the URI
//! maps to.
//!
//! - **`cgi`**: runs the configured script for the configured route
//! - **`directory`**: HTML listing of a folder
//! - **`file`**: streams a file verbatim

pub mod cgi;
pub mod directory;
pub mod file;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWrite;
use tracing::debug;

use crate::config::Config;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::write_response;

pub struct Dispatcher<'a> {
    config: &'a Config,
    peer: SocketAddr,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a Config, peer: SocketAddr) -> Self {
        Self { config, peer }
    }

    /// Writes the response for `request` onto `stream`.
    pub async fn dispatch<W>(&self, stream: &mut W, request: &Request) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let uri = request.uri();

        if uri == self.config.cgi.route {
            return cgi::execute(stream, request, self.config, self.peer).await;
        }

        let path = resolve(&self.config.root, &uri);

        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "stat failed");
                return write_response(stream, &Response::not_found()).await;
            }
        };

        if meta.is_dir() {
            directory::list(stream, &path, &uri, self.config.show_hidden).await
        } else {
            file::send(stream, &path, meta.len()).await
        }
    }
}

/// Maps a decoded URI onto a path below `root`.
///
/// `.` segments are dropped and `..` removes the previous segment; nothing can
/// climb above `root`.
pub fn resolve(root: &Path, uri: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in clean_segments(uri) {
        path.push(segment);
    }
    path
}

pub(crate) fn clean_segments(uri: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in uri.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments
}
