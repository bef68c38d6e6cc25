use std::path::Path;

use anyhow::Context;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::handler::clean_segments;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::{serialize_response, write_response};

const INDEX_HEAD: &str = "<!doctype html>
<html>
<head>
\t<meta charset=\"utf-8\">
</head>
<body>
<ul>
";

const INDEX_TAIL: &str = "</ul>
</body>
</html>
";

/// Writes a 200 response listing the entries of `dir` as links under `uri`.
///
/// Entries are sorted by name. Names starting with a dot are skipped unless
/// `show_hidden` is set.
pub async fn list<W>(stream: &mut W, dir: &Path, uri: &str, show_hidden: bool) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let names = match read_names(dir).await {
        Ok(names) => names,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "can't read folder");
            return write_response(stream, &Response::internal_error()).await;
        }
    };

    let head = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-type", "text/html")
        .build();

    let mut page = serialize_response(&head);
    page.extend_from_slice(INDEX_HEAD.as_bytes());
    for name in names {
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        page.extend_from_slice(
            format!("<li><a href=\"{}\">{}</a></li>\n", join_url(uri, &name), name).as_bytes(),
        );
    }
    page.extend_from_slice(INDEX_TAIL.as_bytes());

    stream.write_all(&page).await.context("can't write listing")?;
    Ok(())
}

async fn read_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Joins a URL path and an entry name with `/`, cleaning the result.
pub fn join_url(base: &str, name: &str) -> String {
    let joined = clean_segments(&format!("{}/{}", base, name)).join("/");
    if base.starts_with('/') {
        format!("/{}", joined)
    } else {
        joined
    }
}
