//! Host health probing subsystem.
//!
//! # Data Flow
//! ```text
//! Scheduled sweeps (scheduler.rs):
//!     Periodic timer
//!     → prober.rs probes every target in order
//!     → metrics sink (latencies + outcome counter)
//!
//! On-demand checks (/net-check):
//!     Inbound request
//!     → prober.rs probes every target in order
//!     → report.rs (JSON response)
//!
//! Each probe (client.rs):
//!     DNS → TCP connect → [TLS] → request → response head → body drained
//! ```
//!
//! # Design Decisions
//! - Targets are fixed at startup
//! - Sweeps are sequential; concurrent sweeps share one sink
//! - A probe failure is an outcome ("0"), never an error for the caller

pub mod client;
pub mod prober;
pub mod report;
pub mod scheduler;

pub use client::{ProbeClient, ProbeError};
pub use prober::HostProber;
pub use report::{NetCheckResponse, ProbeReport, ProbeResult};
pub use scheduler::SweepScheduler;
