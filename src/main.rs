//! envprobe
//!
//! A small diagnostic web service built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌───────────────────────────────────────────────┐
//!                   │                   ENVPROBE                     │
//!                   │                                                │
//!   GET /, /json    │  ┌─────────┐    ┌─────────────┐               │
//!   ────────────────┼─▶│  http   │───▶│ environment │ env + secrets │
//!                   │  │ server  │    └─────────────┘               │
//!   GET /net-check  │  │         │    ┌─────────────┐               │     Probed
//!   ────────────────┼─▶│         │───▶│   health    │───────────────┼───▶ hosts
//!                   │  │         │    │   prober    │◀──┐           │
//!   GET /metrics    │  │         │    └──────┬──────┘   │ scheduler │
//!   ────────────────┼─▶│         │           ▼          │ (periodic)│
//!                   │  └─────────┘    ┌─────────────┐   │           │
//!                   │       ▲         │observability│───┘           │
//!                   │       └─────────│ prometheus  │               │
//!                   │                 └─────────────┘               │
//!                   └───────────────────────────────────────────────┘
//! ```

use envprobe::config::load_from_env;
use envprobe::lifecycle::startup;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = load_from_env()?;
    startup::run(loaded).await?;
    Ok(())
}
