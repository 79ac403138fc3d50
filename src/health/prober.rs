//! Host prober.
//!
//! # Responsibilities
//! - Probe every configured target once per sweep, in order
//! - Record phase latencies and outcome counts into the metrics sink
//! - Return the per-target results to the caller
//!
//! # Design Decisions
//! - A failing target never aborts the sweep; it is reported with code "0"
//! - Latencies are recorded only for completed exchanges
//! - Exactly one outcome increment per target per sweep

use std::sync::Arc;

use crate::health::client::ProbeClient;
use crate::health::report::{ProbeReport, ProbeResult};
use crate::observability::{MetricsSink, Phase};

pub struct HostProber {
    targets: Arc<[String]>,
    client: ProbeClient,
    sink: Arc<dyn MetricsSink>,
}

impl HostProber {
    pub fn new(targets: Vec<String>, client: ProbeClient, sink: Arc<dyn MetricsSink>) -> Self {
        Self {
            targets: targets.into(),
            client,
            sink,
        }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Run one sweep over all targets.
    pub async fn probe_all(&self) -> ProbeReport {
        if self.targets.is_empty() {
            tracing::warn!(
                "Variable HTTP_HOSTS is empty, should be list. Can not proceed http queries to hosts check"
            );
            return ProbeReport::not_configured();
        }

        let mut results = Vec::with_capacity(self.targets.len());
        for target in self.targets.iter() {
            results.push(self.probe(target).await);
        }

        ProbeReport {
            results,
            error: None,
        }
    }

    async fn probe(&self, target: &str) -> ProbeResult {
        let result = match self.client.get(target).await {
            Ok(exchange) => {
                let result = ProbeResult::completed(target, exchange.status.as_u16(), exchange.timings);
                for phase in Phase::ALL {
                    self.sink
                        .observe(phase, target, &result.status_code, exchange.timings.millis(phase));
                }
                tracing::debug!(
                    host = %target,
                    dns_ms = exchange.timings.millis(Phase::DnsLookup),
                    connect_ms = exchange.timings.millis(Phase::TcpConnection),
                    tls_ms = exchange.timings.tls_handshake.map(|d| d.as_secs_f64() * 1000.0),
                    wait_ms = exchange.timings.millis(Phase::ServerProcessing),
                    transfer_ms = exchange.timings.millis(Phase::ContentTransfer),
                    "Probe timings"
                );
                result
            }
            Err(e) => {
                tracing::error!(host = %target, error = %e, "Probe failed");
                ProbeResult::failed(target)
            }
        };

        self.sink.increment(target, &result.status_code);
        tracing::info!(host = %target, code = %result.status_code, "Host probed");
        result
    }
}
