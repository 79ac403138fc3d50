//! Cancellable periodic task.
//!
//! Runs a unit of work, sleeps for a fixed period, and repeats until the
//! shutdown signal fires. The sleep starts when the work completes, so runs
//! never overlap and a slow run delays the next one.

use std::future::Future;
use std::time::Duration;
use tokio::time;

use crate::lifecycle::shutdown::ShutdownSignal;

/// Run `work` immediately, then again `period` after each completion.
///
/// Shutdown interrupts both the sleep and a run in progress.
pub async fn run_every<F, Fut>(period: Duration, mut shutdown: ShutdownSignal, mut work: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        tokio::select! {
            _ = work() => {}
            _ = shutdown.recv() => break,
        }
        tokio::select! {
            _ = time::sleep(period) => {}
            _ = shutdown.recv() => break,
        }
    }
}
