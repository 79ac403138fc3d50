//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and report rejected environment values
//! - Build the metrics sink and the prober in dependency order
//! - Start background tasks (scheduled sweeps, recorder upkeep)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound before the first sweep starts

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{AppConfig, ConfigError, EnvOverrideError, LoadedConfig};
use crate::health::{HostProber, ProbeClient, ProbeError, SweepScheduler};
use crate::http::HttpServer;
use crate::lifecycle::periodic::run_every;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::observability::{logging, PrometheusSink};

const UPKEEP_PERIOD: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("failed to build metrics recorder: {0}")]
    Metrics(#[from] BuildError),

    #[error("failed to build probe client: {0}")]
    ProbeClient(#[from] ProbeError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Core services shared by the HTTP surface and the scheduler.
pub struct Services {
    pub prober: Arc<HostProber>,
    pub sink: Arc<PrometheusSink>,
}

pub fn build_services(config: &AppConfig) -> Result<Services, StartupError> {
    let sink = Arc::new(PrometheusSink::new(&config.observability.histogram_buckets_ms)?);
    let client = ProbeClient::new(&config.probe)?;
    let prober = Arc::new(HostProber::new(
        config.probe.hosts.clone(),
        client,
        sink.clone(),
    ));

    Ok(Services { prober, sink })
}

fn log_rejected(rejected: &[EnvOverrideError]) {
    for error in rejected {
        tracing::error!(var = error.var, value = %error.value, reason = %error.reason, "Ignoring environment value");
    }
}

/// Run the service until a termination signal arrives.
pub async fn run(loaded: LoadedConfig) -> Result<(), StartupError> {
    let LoadedConfig { config, rejected } = loaded;

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "envprobe starting");
    log_rejected(&rejected);

    tracing::info!(
        listen_addr = %config.server.listen_addr,
        hosts = config.probe.hosts.len(),
        period_secs = config.probe.period_secs,
        timeout_secs = config.probe.timeout_secs,
        secrets_dirs = config.environment.secrets_dirs.len(),
        "Configuration loaded"
    );

    let services = build_services(&config)?;

    let listener = TcpListener::bind(&config.server.listen_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.server.listen_addr.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();

    let scheduler = SweepScheduler::new(
        services.prober.clone(),
        Duration::from_secs(config.probe.period_secs),
    );
    let sweeps = tokio::spawn(scheduler.run(shutdown.subscribe()));

    let handle = services.sink.handle();
    let upkeep = tokio::spawn(run_every(UPKEEP_PERIOD, shutdown.subscribe(), move || {
        let handle = handle.clone();
        async move { handle.run_upkeep() }
    }));

    spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config, services.prober, services.sink.handle());
    let served = server.run(listener, shutdown.subscribe()).await;

    shutdown.trigger();
    for task in [sweeps, upkeep] {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Background task failed");
        }
    }

    served.map_err(StartupError::Serve)?;
    tracing::info!("Shutdown complete");
    Ok(())
}
