//! CGI execution against a real script.

#![cfg(unix)]

use std::net::SocketAddr;
use std::os::unix::fs::PermissionsExt;
use std::sync::Arc;

use httpgod::config::Config;
use httpgod::http::connection::Connection;
use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};

const SCRIPT: &str = "#!/bin/sh
echo \"Content-type: text/plain\"
echo
echo \"method=$REQUEST_METHOD\"
echo \"query=$QUERY_STRING\"
echo \"agent=$HTTP_USER_AGENT\"
echo \"remote=$REMOTE_ADDR\"
";

#[tokio::test]
async fn test_script_output_follows_status_line() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("env.cgi");
    std::fs::write(&script, SCRIPT).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut cfg = Config {
        root: dir.path().to_path_buf(),
        ..Config::default()
    };
    cfg.cgi.route = "/env.cgi".to_string();
    cfg.cgi.script = script;

    let (client, server) = duplex(64 * 1024);
    let peer: SocketAddr = "192.0.2.7:5555".parse().unwrap();
    let task = tokio::spawn(Connection::new(server, peer, Arc::new(cfg)).run());

    let (mut rd, mut wr) = tokio::io::split(client);
    wr.write_all(b"post /env.cgi?a=1&b=%20 HTTP/1.0\r\nUser-Agent: tester\r\n\r\n")
        .await
        .unwrap();

    let mut out = Vec::new();
    rd.read_to_end(&mut out).await.unwrap();
    task.await.unwrap().unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "HTTP/1.0 200 OK\r\nContent-type: text/plain\n\nmethod=POST\nquery=a=1&b=%20\nagent=tester\nremote=192.0.2.7\n"
    );
}
