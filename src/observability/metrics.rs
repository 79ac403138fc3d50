//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define probe metrics (phase latencies, response codes)
//! - Expose Prometheus-compatible text exposition
//! - Aggregate per (addr, code) label pair
//!
//! # Metrics
//! - `webapp_dnsLookup` (histogram): DNS resolution time, ms
//! - `webapp_tcpConnection` (histogram): TCP connect time, ms
//! - `webapp_serverProcessing` (histogram): wait for the response head, ms
//! - `webapp_contentTransfer` (histogram): body transfer time, ms
//! - `webapp_responseCodesFromHosts` (counter): probe outcomes, code "0" on failure
//!
//! # Design Decisions
//! - Sinks are injected, never process-wide singletons
//! - Low-overhead metric updates (atomic operations)
//! - The Prometheus recorder is owned by its sink and never installed globally

use std::fmt;

use dashmap::DashMap;
use metrics::{Key, KeyName, Label, Level, Metadata, Recorder, SharedString};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};

pub const NAMESPACE: &str = "webapp";
pub const RESPONSE_CODES_METRIC: &str = "webapp_responseCodesFromHosts";

const ADDR_LABEL: &str = "addr";
const CODE_LABEL: &str = "code";

static METADATA: Metadata<'static> =
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

/// Probe phase measured into its own latency distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    DnsLookup,
    TcpConnection,
    ServerProcessing,
    ContentTransfer,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::DnsLookup,
        Phase::TcpConnection,
        Phase::ServerProcessing,
        Phase::ContentTransfer,
    ];

    pub fn metric_name(self) -> &'static str {
        match self {
            Phase::DnsLookup => "webapp_dnsLookup",
            Phase::TcpConnection => "webapp_tcpConnection",
            Phase::ServerProcessing => "webapp_serverProcessing",
            Phase::ContentTransfer => "webapp_contentTransfer",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Phase::DnsLookup => "Time spend to lookup DNS record",
            Phase::TcpConnection => "Time spend to connect",
            Phase::ServerProcessing => "Time spend on wait of response",
            Phase::ContentTransfer => "Time spend on waiting data from server",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metric_name())
    }
}

/// Destination for probe measurements.
///
/// Implementations must tolerate concurrent writers: the scheduled sweep and
/// on-demand checks record into the same sink at the same time.
pub trait MetricsSink: Send + Sync {
    /// Append one latency observation, in milliseconds.
    fn observe(&self, phase: Phase, addr: &str, code: &str, value_ms: f64);

    /// Count one probe outcome.
    fn increment(&self, addr: &str, code: &str);
}

fn labeled_key(name: &'static str, addr: &str, code: &str) -> Key {
    Key::from_parts(
        name,
        vec![
            Label::new(ADDR_LABEL, addr.to_owned()),
            Label::new(CODE_LABEL, code.to_owned()),
        ],
    )
}

/// Sink backed by a Prometheus recorder.
pub struct PrometheusSink {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl PrometheusSink {
    /// Build a sink whose histograms use the given bucket bounds (ms).
    pub fn new(buckets_ms: &[f64]) -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Prefix(format!("{NAMESPACE}_")), buckets_ms)?
            .build_recorder();
        let handle = recorder.handle();

        for phase in Phase::ALL {
            recorder.describe_histogram(
                KeyName::from_const_str(phase.metric_name()),
                None,
                SharedString::const_str(phase.help()),
            );
        }
        recorder.describe_counter(
            KeyName::from_const_str(RESPONSE_CODES_METRIC),
            None,
            SharedString::const_str("Response codes from hosts"),
        );

        Ok(Self { recorder, handle })
    }

    /// Handle used by the scrape endpoint.
    pub fn handle(&self) -> PrometheusHandle {
        self.handle.clone()
    }

    /// Render the text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl MetricsSink for PrometheusSink {
    fn observe(&self, phase: Phase, addr: &str, code: &str, value_ms: f64) {
        let key = labeled_key(phase.metric_name(), addr, code);
        self.recorder.register_histogram(&key, &METADATA).record(value_ms);
    }

    fn increment(&self, addr: &str, code: &str) {
        let key = labeled_key(RESPONSE_CODES_METRIC, addr, code);
        self.recorder.register_counter(&key, &METADATA).increment(1);
    }
}

type LabelPair = (String, String);

/// Sink that keeps every sample in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    counters: DashMap<LabelPair, u64>,
    observations: DashMap<(Phase, String, String), Vec<f64>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current outcome count for a label pair.
    pub fn count(&self, addr: &str, code: &str) -> u64 {
        self.counters
            .get(&(addr.to_owned(), code.to_owned()))
            .map(|c| *c.value())
            .unwrap_or(0)
    }

    /// Every observation recorded for a phase and label pair.
    pub fn observations(&self, phase: Phase, addr: &str, code: &str) -> Vec<f64> {
        self.observations
            .get(&(phase, addr.to_owned(), code.to_owned()))
            .map(|v| v.value().clone())
            .unwrap_or_default()
    }

    /// Total observations recorded for a phase across all label pairs.
    pub fn observation_count(&self, phase: Phase) -> usize {
        self.observations
            .iter()
            .filter(|entry| entry.key().0 == phase)
            .map(|entry| entry.value().len())
            .sum()
    }
}

impl MetricsSink for InMemorySink {
    fn observe(&self, phase: Phase, addr: &str, code: &str, value_ms: f64) {
        self.observations
            .entry((phase, addr.to_owned(), code.to_owned()))
            .or_default()
            .push(value_ms);
    }

    fn increment(&self, addr: &str, code: &str) {
        *self
            .counters
            .entry((addr.to_owned(), code.to_owned()))
            .or_insert(0) += 1;
    }
}
