//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Stop on the shared shutdown signal

use axum::{body::Body, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::{AppConfig, EnvironmentConfig};
use crate::health::HostProber;
use crate::http::handlers;
use crate::lifecycle::ShutdownSignal;
use crate::observability::tracing::request_span;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub prober: Arc<HostProber>,
    pub metrics: PrometheusHandle,
    pub environment: Arc<EnvironmentConfig>,
}

/// HTTP server for the service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, prober: Arc<HostProber>, metrics: PrometheusHandle) -> Self {
        let state = AppState {
            prober,
            metrics,
            environment: Arc::new(config.environment.clone()),
        };

        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// `/net-check` is outside the request timeout: a sweep is bounded per
    /// target by the probe timeout and always reports every target.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_span::<Body>)
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(PropagateRequestIdLayer::x_request_id());

        let timed = Router::new()
            .route("/", get(handlers::index))
            .route("/json", get(handlers::env_json))
            .route("/ping", get(handlers::ping))
            .route("/metrics", get(handlers::metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)));

        timed
            .route("/net-check", get(handlers::net_check))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, mut shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server is starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
