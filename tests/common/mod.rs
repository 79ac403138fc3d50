//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use envprobe::config::{AppConfig, ProbeConfig};
use envprobe::health::{HostProber, ProbeClient};
use envprobe::http::HttpServer;
use envprobe::lifecycle::Shutdown;
use envprobe::observability::{MetricsSink, PrometheusSink};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned reply of a mock backend.
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl MockResponse {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }
}

/// Start a mock backend on an ephemeral port that answers every request
/// with `f(path)`. Returns the bound address.
pub async fn start_programmable_backend<F>(f: F) -> SocketAddr
where
    F: Fn(&str) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(path) = read_request_path(&mut socket).await else {
                            return;
                        };
                        let response = f(&path);

                        let mut raw = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                            response.status,
                            reason(response.status),
                            response.body.len()
                        );
                        for (name, value) in &response.headers {
                            raw.push_str(&format!("{}: {}\r\n", name, value));
                        }
                        raw.push_str("\r\n");
                        raw.push_str(&response.body);

                        let _ = socket.write_all(raw.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock backend that always answers `status`.
pub async fn start_mock_backend(status: u16, body: &'static str) -> SocketAddr {
    start_programmable_backend(move |_| MockResponse::status(status).with_body(body)).await
}

/// Start a backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _held = socket;
                tokio::time::sleep(Duration::from_secs(3600)).await;
            });
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn probe_config() -> ProbeConfig {
    ProbeConfig {
        timeout_secs: 2,
        ..ProbeConfig::default()
    }
}

pub fn prober(targets: Vec<String>, sink: Arc<dyn MetricsSink>) -> HostProber {
    prober_with(&probe_config(), targets, sink)
}

pub fn prober_with(config: &ProbeConfig, targets: Vec<String>, sink: Arc<dyn MetricsSink>) -> HostProber {
    let client = ProbeClient::new(config).unwrap();
    HostProber::new(targets, client, sink)
}

/// A running envprobe HTTP server on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub sink: Arc<PrometheusSink>,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with a 2 s probe timeout.
pub async fn start_server(mut config: AppConfig) -> TestServer {
    config.probe.timeout_secs = 2;
    start_server_as_configured(config).await
}

pub async fn start_server_as_configured(config: AppConfig) -> TestServer {
    let sink = Arc::new(PrometheusSink::new(&config.observability.histogram_buckets_ms).unwrap());
    let client = ProbeClient::new(&config.probe).unwrap();
    let prober = Arc::new(HostProber::new(config.probe.hosts.clone(), client, sink.clone()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server = HttpServer::new(config, prober, sink.handle());
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer { addr, sink, shutdown }
}

async fn read_request_path(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
