//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use intercept_proxy::config::ProxyConfig;
use intercept_proxy::http::ProxyServer;
use intercept_proxy::net::Listener;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// A request as the mock upstream saw it on the wire.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Request line and header block, exactly as received.
    pub head: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    /// Header lines exactly as sent, casing included.
    pub fn header_lines(&self) -> Vec<&str> {
        self.head
            .lines()
            .skip(1)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Start a mock upstream that answers every connection with `response`
/// (raw HTTP bytes) after `delay`, reporting each request it read.
pub async fn start_upstream(
    response: &'static [u8],
    delay: Duration,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        if let Some(request) = read_request(&mut socket).await {
                            let _ = tx.send(request);
                        }
                        tokio::time::sleep(delay).await;
                        let _ = socket.write_all(response).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[head_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest { head, body })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Port with nothing listening on it.
pub async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Start the proxy on an ephemeral port, forwarding to `upstream_port`.
pub async fn start_proxy(upstream_port: u16) -> SocketAddr {
    let mut config = ProxyConfig::default();
    config.bind_host = "127.0.0.1".into();
    config.listen_port = 0;
    config.upstream_host = "127.0.0.1".into();
    config.upstream_port = upstream_port;
    config.timeouts.request_secs = 5;

    let server = ProxyServer::new(&config).unwrap();
    let listener = Listener::bind(&config).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(server.run(listener));
    addr
}

/// Send raw bytes to `addr` and read until the server closes the connection.
pub async fn raw_exchange(addr: SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
