//! Environment inspection subsystem.
//!
//! # Data Flow
//! ```text
//! process environment + SECRETS_DIRS (walked recursively)
//!     → snapshot.rs (EnvSnapshot, collected on a blocking thread)
//!     → render.rs (HTML for /) or serde (JSON for /json)
//! ```
//!
//! # Design Decisions
//! - Collected fresh on every request; nothing is cached
//! - Unreadable secret paths are logged and skipped

pub mod render;
pub mod snapshot;

pub use render::render_html;
pub use snapshot::{snapshot, EnvSnapshot};
