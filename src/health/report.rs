//! Probe results and the `/net-check` wire format.

use serde::{Deserialize, Serialize};

use crate::health::client::PhaseTimings;

/// Reported instead of results when no targets are configured.
pub const TARGETS_NOT_CONFIGURED: &str = "Variable HTTP_HOSTS is empty, should be list";

/// Status code recorded when a probe could not complete.
pub const FAILED_CODE: &str = "0";

/// Outcome of probing one target.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub target: String,
    /// Decimal HTTP status, or "0" on failure.
    pub status_code: String,
    /// Present only when the exchange completed.
    pub timings: Option<PhaseTimings>,
}

impl ProbeResult {
    pub fn completed(target: &str, status: u16, timings: PhaseTimings) -> Self {
        Self {
            target: target.to_string(),
            status_code: status.to_string(),
            timings: Some(timings),
        }
    }

    pub fn failed(target: &str) -> Self {
        Self {
            target: target.to_string(),
            status_code: FAILED_CODE.to_string(),
            timings: None,
        }
    }
}

/// One full sweep over all targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeReport {
    /// One entry per target, in configured order.
    pub results: Vec<ProbeResult>,
    pub error: Option<String>,
}

impl ProbeReport {
    pub fn not_configured() -> Self {
        Self {
            results: Vec::new(),
            error: Some(TARGETS_NOT_CONFIGURED.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostStatus {
    pub addr: String,
    pub code: String,
}

/// JSON body served by `/net-check`.
///
/// `Hosts` is `null` when there are no results and `Error` is empty when
/// unset. Timings are not part of this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetCheckResponse {
    pub hosts: Option<Vec<HostStatus>>,
    pub error: String,
}

impl From<&ProbeReport> for NetCheckResponse {
    fn from(report: &ProbeReport) -> Self {
        let hosts = (!report.results.is_empty()).then(|| {
            report
                .results
                .iter()
                .map(|r| HostStatus {
                    addr: r.target.clone(),
                    code: r.status_code.clone(),
                })
                .collect()
        });

        Self {
            hosts,
            error: report.error.clone().unwrap_or_default(),
        }
    }
}
