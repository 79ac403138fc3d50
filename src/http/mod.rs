//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → handlers.rs
//!         /           → environment snapshot as HTML
//!         /json       → environment snapshot as JSON
//!         /ping       → liveness
//!         /net-check  → on-demand sweep
//!         /metrics    → Prometheus exposition
//!     → Send to client
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
