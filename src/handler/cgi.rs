//! CGI/1.1 script execution.
//!
//! The script is spawned with a cleared environment that carries only the
//! CGI variables. Its standard output becomes the response after the status
//! line, so the script supplies its own headers.

use std::net::SocketAddr;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::{status_line, write_response};

const SERVER_SOFTWARE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Runs the configured script and pipes its output to `stream`.
///
/// A script that cannot be started is answered with a 500 instead.
pub async fn execute<W>(
    stream: &mut W,
    request: &Request,
    config: &Config,
    peer: SocketAddr,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let script = &config.cgi.script;

    let mut child = match Command::new(script)
        .env_clear()
        .envs(environment(request, config, peer))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            error!(script = %script.display(), error = %e, "can't execute script");
            return write_response(stream, &Response::internal_error()).await;
        }
    };

    stream
        .write_all(status_line(StatusCode::Ok).as_bytes())
        .await
        .context("can't write status line")?;

    if let Some(mut stdout) = child.stdout.take() {
        tokio::io::copy(&mut stdout, stream)
            .await
            .context("can't forward script output")?;
    }
    stream.flush().await?;

    let status = child.wait().await.context("can't wait for script")?;
    if status.success() {
        info!(script = %script.display(), "script finished");
    } else {
        warn!(script = %script.display(), %status, "script exited with failure");
    }

    Ok(())
}

/// Builds the CGI/1.1 variables for `request`.
///
/// Values the server does not know (auth, path info, remote host) are
/// present but empty.
pub fn environment(request: &Request, config: &Config, peer: SocketAddr) -> Vec<(&'static str, String)> {
    let header = |name: &str| {
        request
            .header(name)
            .map(|v| String::from_utf8_lossy(v).into_owned())
            .unwrap_or_default()
    };

    vec![
        ("SERVER_SOFTWARE", SERVER_SOFTWARE.to_string()),
        ("SERVER_NAME", config.server.host.clone()),
        ("GATEWAY_INTERFACE", "CGI/1.1".to_string()),
        ("SERVER_PROTOCOL", request.version()),
        ("SERVER_PORT", config.server.port.to_string()),
        ("REQUEST_METHOD", request.method()),
        ("PATH_INFO", String::new()),
        ("PATH_TRANSLATED", String::new()),
        ("SCRIPT_NAME", config.cgi.route.clone()),
        ("QUERY_STRING", request.query()),
        ("REMOTE_HOST", String::new()),
        ("REMOTE_ADDR", peer.ip().to_string()),
        ("AUTH_TYPE", String::new()),
        ("REMOTE_USER", String::new()),
        ("REMOTE_IDENT", String::new()),
        ("CONTENT_TYPE", header("Content-Type")),
        ("CONTENT_LENGTH", header("Content-Length")),
        ("HTTP_ACCEPT", header("Accept")),
        ("HTTP_ACCEPT_LANGUAGE", header("Accept-Language")),
        ("HTTP_USER_AGENT", header("User-Agent")),
        ("HTTP_COOKIE", header("Cookie")),
    ]
}
