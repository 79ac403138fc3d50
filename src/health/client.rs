//! Phase-timed HTTP client for probes.
//!
//! # Responsibilities
//! - Resolve, connect, (TLS) handshake and exchange one GET per hop
//! - Time each phase separately
//! - Follow redirects up to a configured limit
//!
//! # Design Decisions
//! - A fresh connection per probe, so DNS and connect phases are always measured
//! - HTTP/1.1 only
//! - The whole probe of one target (all hops) is bounded by one timeout

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::header::{self, HeaderValue, InvalidHeaderValue};
use axum::http::{Method, Request, StatusCode};
use futures_util::StreamExt;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{lookup_host, TcpStream};
use tokio::time;
use tokio_native_tls::TlsConnector;
use url::{Host, Url};

use crate::config::ProbeConfig;
use crate::observability::Phase;

/// Error type for a single probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid target url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),

    #[error("target url has no host")]
    MissingHost,

    #[error("dns lookup for {host} failed: {source}")]
    Dns { host: String, source: io::Error },

    #[error("dns lookup for {0} returned no addresses")]
    NoAddresses(String),

    #[error("tcp connect failed: {0}")]
    Connect(io::Error),

    #[error("tls handshake failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("failed to build request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("invalid user agent: {0}")]
    UserAgent(#[from] InvalidHeaderValue),

    #[error("http exchange failed: {0}")]
    Http(#[from] hyper::Error),

    #[error("failed to read response body: {0}")]
    Body(axum::Error),

    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    #[error("stopped after {0} redirects")]
    TooManyRedirects(usize),
}

/// Durations of each phase of one completed exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseTimings {
    pub dns_lookup: Duration,
    pub tcp_connection: Duration,
    /// Only set for https targets.
    pub tls_handshake: Option<Duration>,
    /// From sending the request until the response head arrived.
    pub server_processing: Duration,
    /// From the response head until the body was fully read.
    pub content_transfer: Duration,
}

impl PhaseTimings {
    pub fn duration(&self, phase: Phase) -> Duration {
        match phase {
            Phase::DnsLookup => self.dns_lookup,
            Phase::TcpConnection => self.tcp_connection,
            Phase::ServerProcessing => self.server_processing,
            Phase::ContentTransfer => self.content_transfer,
        }
    }

    pub fn millis(&self, phase: Phase) -> f64 {
        self.duration(phase).as_secs_f64() * 1000.0
    }
}

/// Outcome of the final hop of a probe.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub status: StatusCode,
    pub location: Option<String>,
    pub timings: PhaseTimings,
}

/// HTTP client used by the prober.
#[derive(Clone)]
pub struct ProbeClient {
    tls: TlsConnector,
    timeout: Duration,
    max_redirects: usize,
    user_agent: HeaderValue,
}

impl ProbeClient {
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let mut builder = native_tls::TlsConnector::builder();
        builder.danger_accept_invalid_certs(config.accept_invalid_certs);
        let tls = TlsConnector::from(builder.build()?);

        Ok(Self {
            tls,
            timeout: Duration::from_secs(config.timeout_secs),
            max_redirects: config.max_redirects,
            user_agent: HeaderValue::from_str(&config.user_agent)?,
        })
    }

    /// GET `target`, following redirects, bounded by the probe timeout.
    ///
    /// A redirect beyond `max_redirects` fails the probe.
    pub async fn get(&self, target: &str) -> Result<Exchange, ProbeError> {
        let url = Url::parse(target)?;
        match time::timeout(self.timeout, self.follow(url)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
        }
    }

    async fn follow(&self, mut url: Url) -> Result<Exchange, ProbeError> {
        let mut hops = 0;
        loop {
            let exchange = self.exchange(&url).await?;
            match exchange.location.as_deref() {
                Some(_) if exchange.status.is_redirection() && hops == self.max_redirects => {
                    return Err(ProbeError::TooManyRedirects(hops));
                }
                Some(location) if exchange.status.is_redirection() => {
                    let next = url.join(location)?;
                    tracing::debug!(from = %url, to = %next, status = %exchange.status, "Following redirect");
                    url = next;
                    hops += 1;
                }
                _ => return Ok(exchange),
            }
        }
    }

    async fn exchange(&self, url: &Url) -> Result<Exchange, ProbeError> {
        let secure = match url.scheme() {
            "http" => false,
            "https" => true,
            other => return Err(ProbeError::UnsupportedScheme(other.to_string())),
        };
        let host = url.host().ok_or(ProbeError::MissingHost)?;
        let port = url.port_or_known_default().ok_or(ProbeError::MissingHost)?;
        let request = self.build_request(url)?;

        let started = Instant::now();
        let addrs = resolve(&host, port).await?;
        let dns_lookup = started.elapsed();

        let started = Instant::now();
        let stream = connect(&addrs).await?;
        let tcp_connection = started.elapsed();

        let (head, tls_handshake) = if secure {
            let started = Instant::now();
            let stream = self.tls.connect(&tls_domain(&host), stream).await?;
            let tls_handshake = started.elapsed();
            (send(stream, request).await?, Some(tls_handshake))
        } else {
            (send(stream, request).await?, None)
        };

        Ok(Exchange {
            status: head.status,
            location: head.location,
            timings: PhaseTimings {
                dns_lookup,
                tcp_connection,
                tls_handshake,
                server_processing: head.server_processing,
                content_transfer: head.content_transfer,
            },
        })
    }

    fn build_request(&self, url: &Url) -> Result<Request<Body>, ProbeError> {
        let host = url.host_str().ok_or(ProbeError::MissingHost)?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(header::HOST, authority)
            .header(header::USER_AGENT, self.user_agent.clone())
            .body(Body::empty())?;
        Ok(request)
    }
}

struct ResponseHead {
    status: StatusCode,
    location: Option<String>,
    server_processing: Duration,
    content_transfer: Duration,
}

async fn resolve(host: &Host<&str>, port: u16) -> Result<Vec<SocketAddr>, ProbeError> {
    let addrs: Vec<SocketAddr> = match host {
        Host::Ipv4(ip) => vec![SocketAddr::new(IpAddr::V4(*ip), port)],
        Host::Ipv6(ip) => vec![SocketAddr::new(IpAddr::V6(*ip), port)],
        Host::Domain(domain) => lookup_host((*domain, port))
            .await
            .map_err(|source| ProbeError::Dns {
                host: domain.to_string(),
                source,
            })?
            .collect(),
    };

    if addrs.is_empty() {
        return Err(ProbeError::NoAddresses(host.to_string()));
    }
    Ok(addrs)
}

async fn connect(addrs: &[SocketAddr]) -> Result<TcpStream, ProbeError> {
    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect(*addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!(addr = %addr, error = %e, "Connect attempt failed");
                last_error = Some(e);
            }
        }
    }
    Err(ProbeError::Connect(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "no address to connect to")
    })))
}

fn tls_domain(host: &Host<&str>) -> String {
    match host {
        Host::Domain(domain) => domain.to_string(),
        Host::Ipv4(ip) => ip.to_string(),
        Host::Ipv6(ip) => ip.to_string(),
    }
}

async fn send<S>(stream: S, request: Request<Body>) -> Result<ResponseHead, ProbeError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::debug!(error = %e, "Probe connection closed with error");
        }
    });

    let started = Instant::now();
    let response = sender.send_request(request).await?;
    let server_processing = started.elapsed();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    // The body is drained, not kept: only its transfer time matters.
    let started = Instant::now();
    let mut body = Body::new(response.into_body()).into_data_stream();
    while let Some(chunk) = body.next().await {
        chunk.map_err(ProbeError::Body)?;
    }
    let content_transfer = started.elapsed();

    Ok(ResponseHead {
        status,
        location,
        server_processing,
        content_transfer,
    })
}
