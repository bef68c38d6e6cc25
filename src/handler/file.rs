use std::path::Path;

use anyhow::Context;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::write_response;

/// Extensions served as `text/plain; charset=utf-8`. Everything else goes out
/// without a content type.
const TEXT_EXTENSIONS: &[&str] = &[
    ".txt", ".log", ".md", ".ls", ".example", ".sh", ".js", ".json", ".go",
];

pub fn is_text_file(name: &str) -> bool {
    TEXT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Writes a 200 response with `Content-length: size` followed by the file.
pub async fn send<W>(stream: &mut W, path: &Path, size: u64) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "can't open file");
            return write_response(stream, &Response::internal_error()).await;
        }
    };

    let mut head = ResponseBuilder::new(StatusCode::Ok).header("Content-length", size.to_string());
    if is_text_file(&path.to_string_lossy()) {
        head = head.header("Content-type", "text/plain; charset=utf-8");
    }

    write_response(stream, &head.build()).await?;
    tokio::io::copy(&mut file, stream)
        .await
        .context("can't write file body")?;
    stream.flush().await?;

    Ok(())
}
