//! End-to-end tests over real TCP connections

use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use warden::config::Config;
use warden::server::Listener;

const INDEX: &str = "<html><body><h1>Welcome</h1></body></html>";
const STYLES: &str = "body { color: #333; }";
const LOGO: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff, 0x10];

struct Site {
    _tmp: TempDir,
    addr: SocketAddr,
}

fn site_config(tmp: &TempDir) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        document_root: tmp.path().join("www"),
        backlog: 128,
        ..Config::default()
    }
}

fn build_tree() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let www = tmp.path().join("www");
    fs::create_dir_all(www.join("images")).unwrap();
    fs::write(www.join("index.html"), INDEX).unwrap();
    fs::write(www.join("styles.css"), STYLES).unwrap();
    fs::write(www.join("images/logo.png"), LOGO).unwrap();
    fs::create_dir_all(tmp.path().join("www2")).unwrap();
    fs::write(tmp.path().join("www2/leak.html"), "LEAKED").unwrap();
    fs::write(tmp.path().join("secret.txt"), "TOP SECRET").unwrap();
    tmp
}

async fn start_with(tmp: TempDir, cfg: Config) -> Site {
    let listener = Listener::bind(&cfg).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(listener.serve());
    Site { _tmp: tmp, addr }
}

async fn start() -> Site {
    let tmp = build_tree();
    let cfg = site_config(&tmp);
    start_with(tmp, cfg).await
}

/// Sends raw bytes and reads until the server closes.
async fn send_raw(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    let mut out = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut out))
        .await
        .expect("server did not close the connection")
        .unwrap();
    out
}

struct Reply {
    status_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Reply {
    fn status(&self) -> u16 {
        self.status_line.split(' ').nth(1).unwrap().parse().unwrap()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn parse_reply(raw: &[u8]) -> Reply {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no header terminator");
    let head = std::str::from_utf8(&raw[..split]).unwrap();
    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap().to_string();
    let headers = lines
        .map(|l| {
            let (k, v) = l.split_once(": ").unwrap();
            (k.to_string(), v.to_string())
        })
        .collect();
    Reply {
        status_line,
        headers,
        body: raw[split + 4..].to_vec(),
    }
}

async fn get(addr: SocketAddr, target: &str) -> Reply {
    let req = format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", target);
    parse_reply(&send_raw(addr, req.as_bytes()).await)
}

#[tokio::test]
async fn test_get_root_serves_index() {
    let site = start().await;
    let reply = get(site.addr, "/").await;

    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("text/html"));
    assert_eq!(reply.body, INDEX.as_bytes());
}

#[tokio::test]
async fn test_get_index_html_same_as_root() {
    let site = start().await;
    let a = send_raw(site.addr, b"GET / HTTP/1.1\r\n\r\n").await;
    let b = send_raw(site.addr, b"GET /index.html HTTP/1.1\r\n\r\n").await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_get_css() {
    let site = start().await;
    let reply = get(site.addr, "/styles.css").await;

    assert_eq!(reply.status(), 200);
    assert_eq!(reply.header("Content-Type"), Some("text/css"));
    assert_eq!(reply.body, STYLES.as_bytes());
}

#[tokio::test]
async fn test_get_png_round_trip() {
    let site = start().await;
    let reply = get(site.addr, "/images/logo.png").await;

    assert_eq!(reply.status(), 200);
    assert_eq!(reply.header("Content-Type"), Some("image/png"));
    assert_eq!(reply.header("Content-Length"), Some(LOGO.len().to_string().as_str()));
    assert_eq!(reply.body, LOGO);
}

#[tokio::test]
async fn test_only_two_headers_sent() {
    let site = start().await;
    let reply = get(site.addr, "/styles.css").await;

    let names: Vec<&str> = reply.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, vec!["Content-Type", "Content-Length"]);
}

#[tokio::test]
async fn test_missing_file_404() {
    let site = start().await;
    let reply = get(site.addr, "/missing.html").await;

    assert_eq!(reply.status_line, "HTTP/1.1 404 Not Found");
    assert_eq!(reply.header("Content-Type"), Some("text/html"));
    let body = String::from_utf8(reply.body.clone()).unwrap();
    assert!(body.contains("missing.html"));
    assert_eq!(reply.header("Content-Length"), Some(reply.body.len().to_string().as_str()));
}

#[tokio::test]
async fn test_traversal_is_404() {
    let site = start().await;

    for target in [
        "/../secret.txt",
        "/images/../../secret.txt",
        "/../www2/leak.html",
        "/../../../../../../etc/passwd",
        "//etc/passwd",
    ] {
        let reply = get(site.addr, target).await;
        assert_eq!(reply.status(), 404, "target {}", target);
        let body = String::from_utf8_lossy(&reply.body);
        assert!(!body.contains("TOP SECRET"));
        assert!(!body.contains("LEAKED"));
        assert!(!body.contains("root:"));
    }
}

#[tokio::test]
async fn test_traversal_and_missing_look_alike() {
    let site = start().await;
    let escape = get(site.addr, "/../secret.txt").await;
    let missing = get(site.addr, "/nothing.txt").await;

    assert_eq!(escape.status_line, missing.status_line);
    assert_eq!(escape.headers[0], missing.headers[0]);
}

#[tokio::test]
async fn test_directory_target_is_404() {
    let site = start().await;
    assert_eq!(get(site.addr, "/images").await.status(), 404);
}

#[tokio::test]
async fn test_non_get_methods_are_501() {
    let site = start().await;

    for req in [
        "POST /index.html HTTP/1.1\r\n\r\n",
        "PUT /missing.html HTTP/1.1\r\n\r\n",
        "DELETE /../secret.txt HTTP/1.1\r\n\r\n",
        "HEAD / HTTP/1.1\r\n\r\n",
        "get / HTTP/1.1\r\n\r\n",
        "BREW /pot HTTP/1.1\r\n\r\n",
    ] {
        let reply = parse_reply(&send_raw(site.addr, req.as_bytes()).await);
        assert_eq!(reply.status_line, "HTTP/1.1 501 Not Implemented", "request {:?}", req);
        assert_eq!(
            reply.body,
            b"<html><body><h1>501 Not Implemented</h1></body></html>".to_vec()
        );
    }
}

#[tokio::test]
async fn test_repeated_get_is_byte_identical() {
    let site = start().await;
    let first = send_raw(site.addr, b"GET /images/logo.png HTTP/1.1\r\n\r\n").await;
    let second = send_raw(site.addr, b"GET /images/logo.png HTTP/1.1\r\n\r\n").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_changed_file_is_reread() {
    let tmp = build_tree();
    let index = tmp.path().join("www/index.html");
    let cfg = site_config(&tmp);
    let site = start_with(tmp, cfg).await;

    assert_eq!(get(site.addr, "/").await.body, INDEX.as_bytes());
    fs::write(&index, "v2").unwrap();
    assert_eq!(get(site.addr, "/").await.body, b"v2");
}

#[tokio::test]
async fn test_malformed_request_closed_silently() {
    let site = start().await;
    assert!(send_raw(site.addr, b"GARBAGE\r\n\r\n").await.is_empty());
    assert!(send_raw(site.addr, b"\r\n\r\n").await.is_empty());
}

#[tokio::test]
async fn test_client_disconnect_without_data() {
    let site = start().await;
    let mut stream = TcpStream::connect(site.addr).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut out = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut out))
        .await
        .unwrap()
        .unwrap();
    assert!(out.is_empty());

    // Server still answers afterwards
    assert_eq!(get(site.addr, "/").await.status(), 200);
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let site = start().await;

    let (css, png) = tokio::join!(get(site.addr, "/styles.css"), get(site.addr, "/images/logo.png"));

    assert_eq!(css.body, STYLES.as_bytes());
    assert_eq!(png.body, LOGO);
}

#[tokio::test]
async fn test_many_concurrent_requests() {
    let site = start().await;

    let mut handles = Vec::new();
    for i in 0..32 {
        let addr = site.addr;
        handles.push(tokio::spawn(async move {
            let target = if i % 2 == 0 { "/styles.css" } else { "/images/logo.png" };
            (target, get(addr, target).await)
        }));
    }

    for handle in handles {
        let (target, reply) = handle.await.unwrap();
        assert_eq!(reply.status(), 200);
        if target == "/styles.css" {
            assert_eq!(reply.body, STYLES.as_bytes());
        } else {
            assert_eq!(reply.body, LOGO);
        }
    }
}

#[tokio::test]
async fn test_stalled_client_does_not_block_others() {
    let site = start().await;

    // Connects and never sends anything
    let _stalled = TcpStream::connect(site.addr).await.unwrap();

    let reply = timeout(Duration::from_secs(5), get(site.addr, "/styles.css"))
        .await
        .expect("request blocked behind stalled client");
    assert_eq!(reply.status(), 200);
}

#[tokio::test]
async fn test_connection_limit_queues_excess_clients() {
    let tmp = build_tree();
    let cfg = Config {
        max_connections: Some(1),
        ..site_config(&tmp)
    };
    let site = start_with(tmp, cfg).await;

    let stalled = TcpStream::connect(site.addr).await.unwrap();
    // Give the accept loop time to hand the only slot to the stalled client
    tokio::time::sleep(Duration::from_millis(100)).await;

    let addr = site.addr;
    let waiting = tokio::spawn(async move { get(addr, "/").await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!waiting.is_finished());

    // Releasing the slot lets the queued request through
    drop(stalled);
    let reply = timeout(Duration::from_secs(5), waiting)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply.status(), 200);
}

#[tokio::test]
async fn test_bind_conflict_fails() {
    let tmp = build_tree();
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let cfg = Config {
        port: occupied.local_addr().unwrap().port(),
        ..site_config(&tmp)
    };

    assert!(Listener::bind(&cfg).await.is_err());
}

#[tokio::test]
async fn test_aborted_client_does_not_stop_listener() {
    let tmp = build_tree();
    // Large enough that the response cannot sit entirely in socket buffers
    fs::write(tmp.path().join("www/big.bin"), vec![0xabu8; 16 * 1024 * 1024]).unwrap();
    let cfg = site_config(&tmp);
    let site = start_with(tmp, cfg).await;

    for _ in 0..3 {
        let mut stream = TcpStream::connect(site.addr).await.unwrap();
        stream.write_all(b"GET /big.bin HTTP/1.1\r\n\r\n").await.unwrap();
        let mut first = [0u8; 1024];
        let n = stream.read(&mut first).await.unwrap();
        assert!(first[..n].starts_with(b"HTTP/1.1 200 OK"));

        // Reset instead of a clean close, aborting the transfer mid-body
        stream.set_linger(Some(Duration::ZERO)).unwrap();
        drop(stream);
    }

    let reply = timeout(Duration::from_secs(5), get(site.addr, "/"))
        .await
        .expect("listener stopped after aborted transfers");
    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    assert_eq!(reply.body, INDEX.as_bytes());
}

#[tokio::test]
async fn test_smoke_sweep() {
    let site = start().await;

    let expected = [
        ("/", 200),
        ("/index.html", 200),
        ("/styles.css", 200),
        ("/images/logo.png", 200),
        ("/pagina1.html", 404),
        ("/images/animal.jpg", 404),
        ("/nonEsiste.html", 404),
    ];
    for (target, status) in expected {
        assert_eq!(get(site.addr, target).await.status(), status, "target {}", target);
    }
}
