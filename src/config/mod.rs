//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (ENVPROBE_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (LISTEN_ADDR, HTTP_HOSTS, ...)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow running with no configuration at all
//! - A malformed environment value is logged and ignored, never fatal
//! - A broken config file is fatal at startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, ConfigError, EnvOverrideError, LoadedConfig};
pub use schema::AppConfig;
pub use schema::EnvironmentConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::ProbeConfig;
pub use schema::ServerConfig;
