//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init logging → Build sink and prober → Bind listener
//!     → Start background tasks → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop sweeps → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then listeners
//! - Fail fast: any startup error is fatal
//! - Background tasks are periodic.rs loops stopped by one shared signal

pub mod periodic;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
