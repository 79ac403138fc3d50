//! Scheduled sweeps.
//!
//! # Responsibilities
//! - Run a sweep over all targets at a fixed period
//! - Keep metrics fresh between scrapes
//!
//! # Design Decisions
//! - The report is discarded; only the metric side effects matter here
//! - Sweeps never overlap: the period counts from the end of a sweep
//! - Stops on the shared shutdown signal

use std::sync::Arc;
use std::time::Duration;

use crate::health::prober::HostProber;
use crate::lifecycle::periodic::run_every;
use crate::lifecycle::shutdown::ShutdownSignal;

pub struct SweepScheduler {
    prober: Arc<HostProber>,
    period: Duration,
}

impl SweepScheduler {
    pub fn new(prober: Arc<HostProber>, period: Duration) -> Self {
        Self { prober, period }
    }

    pub async fn run(self, shutdown: ShutdownSignal) {
        tracing::info!(
            period_secs = self.period.as_secs(),
            targets = self.prober.targets().len(),
            "Will check http hosts every {:?}",
            self.period
        );

        let prober = self.prober;
        run_every(self.period, shutdown, move || {
            let prober = prober.clone();
            async move {
                tracing::info!("Start regular checks to HTTP hosts");
                prober.probe_all().await;
            }
        })
        .await;

        tracing::info!("Sweep scheduler received shutdown signal, exiting loop");
    }
}
