//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (probe histograms and outcome counter)
//!     → tracing.rs (per-request spans with request IDs)
//!
//! Consumers:
//!     → stdout (JSON or pretty)
//!     → /metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every request log line
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use metrics::{InMemorySink, MetricsSink, Phase, PrometheusSink};
