//! Diagnostic web service: environment inspection and periodic HTTP host probing.

pub mod config;
pub mod environment;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
