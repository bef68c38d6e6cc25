//! End-to-end tests over real TCP connections.

use std::path::Path;
use std::sync::Arc;

use httpgod::config::Config;
use httpgod::server::listener::serve;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn start(root: &Path, show_hidden: bool) -> std::net::SocketAddr {
    let cfg = Config {
        root: root.to_path_buf(),
        show_hidden,
        ..Config::default()
    };
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, Arc::new(cfg)));
    addr
}

async fn roundtrip(addr: std::net::SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    // A reset after a rejected request just ends the read.
    let mut out = Vec::new();
    let _ = stream.read_to_end(&mut out).await;
    out
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hello.txt"), "hello world\n").unwrap();
    std::fs::write(dir.path().join("data.bin"), [0u8, 159, 146, 150, 13, 10, 0]).unwrap();
    std::fs::write(dir.path().join(".hidden"), "shh").unwrap();
    std::fs::create_dir(dir.path().join("sub dir")).unwrap();
    std::fs::write(dir.path().join("sub dir").join("inner.md"), "# inner").unwrap();
    dir
}

#[tokio::test]
async fn test_missing_path_is_404() {
    let dir = fixture();
    let addr = start(dir.path(), false).await;

    let out = roundtrip(addr, b"GET /missing HTTP/1.0\r\n\r\n").await;
    assert!(out.starts_with(b"HTTP/1.0 404 Not Found\r\n"));
}

#[tokio::test]
async fn test_directory_listing() {
    let dir = fixture();
    let addr = start(dir.path(), false).await;

    let out = String::from_utf8(roundtrip(addr, b"GET / HTTP/1.0\r\nHost: test\r\n\r\n").await).unwrap();

    assert!(out.starts_with("HTTP/1.0 200 OK\r\nContent-type: text/html\r\n\r\n"));
    let items: Vec<&str> = out.lines().filter(|l| l.starts_with("<li>")).collect();
    assert_eq!(
        items,
        vec![
            "<li><a href=\"/data.bin\">data.bin</a></li>",
            "<li><a href=\"/hello.txt\">hello.txt</a></li>",
            "<li><a href=\"/sub dir\">sub dir</a></li>",
        ]
    );
}

#[tokio::test]
async fn test_directory_listing_with_hidden_files() {
    let dir = fixture();
    let addr = start(dir.path(), true).await;

    let out = String::from_utf8(roundtrip(addr, b"GET / HTTP/1.0\r\n\r\n").await).unwrap();
    assert_eq!(out.matches("<li>").count(), 4);
    assert!(out.contains("<li><a href=\"/.hidden\">.hidden</a></li>"));
}

#[tokio::test]
async fn test_percent_encoded_directory() {
    let dir = fixture();
    let addr = start(dir.path(), false).await;

    let out = String::from_utf8(roundtrip(addr, b"GET /sub%20dir?sort=name HTTP/1.0\n\n").await).unwrap();
    assert!(out.contains("<li><a href=\"/sub dir/inner.md\">inner.md</a></li>"));
}

#[tokio::test]
async fn test_binary_file_is_byte_identical() {
    let dir = fixture();
    let addr = start(dir.path(), false).await;
    let contents = std::fs::read(dir.path().join("data.bin")).unwrap();

    let out = roundtrip(addr, b"GET /data.bin HTTP/1.0\r\n\r\n").await;

    let head = b"HTTP/1.0 200 OK\r\nContent-length: 7\r\n\r\n";
    assert!(out.starts_with(head));
    assert_eq!(&out[head.len()..], &contents[..]);
}

#[tokio::test]
async fn test_text_file_has_content_type() {
    let dir = fixture();
    let addr = start(dir.path(), false).await;

    let out = roundtrip(addr, b"GET /hello.txt HTTP/1.0\r\n\r\n").await;
    assert_eq!(
        out,
        b"HTTP/1.0 200 OK\r\nContent-length: 12\r\nContent-type: text/plain; charset=utf-8\r\n\r\nhello world\n"
            .to_vec()
    );
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let dir = fixture();
    let addr = start(dir.path(), false).await;

    for request in [&b"GET / HTTP/1.0\r\n\r\n"[..], &b"GET /hello.txt HTTP/1.0\r\n\r\n"[..]] {
        let first = roundtrip(addr, request).await;
        let second = roundtrip(addr, request).await;
        assert_eq!(first, second);
    }
}

#[tokio::test]
async fn test_malformed_request_closes_without_response() {
    let dir = fixture();
    let addr = start(dir.path(), false).await;

    let out = roundtrip(addr, b"GET /hello.txt\r\n\r\n").await;
    assert!(out.is_empty());

    // The server keeps accepting after a bad connection.
    let out = roundtrip(addr, b"GET /hello.txt HTTP/1.0\r\n\r\n").await;
    assert!(out.starts_with(b"HTTP/1.0 200 OK\r\n"));
}

#[tokio::test]
async fn test_request_split_across_writes() {
    let dir = fixture();
    let addr = start(dir.path(), false).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let parts: [&[u8]; 4] = [b"GET /hel", b"lo.txt HTTP/1.0\r", b"\nUser-Agent: t\r\n", b"\r\n"];
    for part in parts {
        stream.write_all(part).await.unwrap();
        stream.flush().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    assert!(out.ends_with(b"\r\n\r\nhello world\n"));
}

#[tokio::test]
async fn test_dot_dot_stays_inside_root() {
    let dir = fixture();
    let root = dir.path().join("sub dir");
    let addr = start(&root, false).await;

    let out = roundtrip(addr, b"GET /../hello.txt HTTP/1.0\r\n\r\n").await;
    assert!(out.starts_with(b"HTTP/1.0 404 Not Found\r\n"));
}
