//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use met_no_proxy::config::ProxyConfig;
use met_no_proxy::{HttpServer, Shutdown};

/// What the mock upstream answers with.
#[derive(Clone)]
pub struct MockResponse {
    pub status_line: &'static str,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Vec<u8>,
    pub delay: Duration,
    /// Announce this many body bytes instead of the real length, then stall after sending the body.
    pub declared_length: Option<usize>,
}

impl MockResponse {
    pub fn ok(body: &str) -> Self {
        Self {
            status_line: "200 OK",
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
            delay: Duration::ZERO,
            declared_length: None,
        }
    }
}

/// A raw-TCP upstream that records every request head it receives.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    /// Request heads (request line plus headers) received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

pub async fn start_mock_upstream(response: MockResponse) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let response = response.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                serve_one(socket, response, recorded).await;
            });
        }
    });

    MockUpstream { addr, requests }
}

async fn serve_one(mut socket: TcpStream, response: MockResponse, recorded: Arc<Mutex<Vec<String>>>) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    recorded
        .lock()
        .unwrap()
        .push(String::from_utf8_lossy(&head).into_owned());

    tokio::time::sleep(response.delay).await;

    let mut out = format!("HTTP/1.1 {}\r\n", response.status_line);
    for (name, value) in &response.headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        response.declared_length.unwrap_or(response.body.len())
    ));

    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(&response.body);
    let _ = socket.write_all(&bytes).await;
    if response.declared_length.is_some() {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }
    let _ = socket.shutdown().await;
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start the proxy against `upstream_addr`. Returns its address and the shutdown handle.
pub async fn start_proxy(upstream_addr: SocketAddr, timeout_secs: u64) -> (SocketAddr, Shutdown) {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = format!("http://{upstream_addr}/weatherapi");
    config.upstream.timeout_secs = timeout_secs;

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Case-insensitive lookup of a header line in a recorded request head.
pub fn header_in(head: &str, name: &str) -> Option<String> {
    head.lines().skip(1).find_map(|line| {
        let (k, v) = line.split_once(':')?;
        k.trim()
            .eq_ignore_ascii_case(name)
            .then(|| v.trim().to_string())
    })
}
