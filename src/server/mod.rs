//! HTTP API server for sendboard.
//!
//! This module exposes the send store, leaderboards and trends over HTTP
//! using axum. Several named stores can be served side by side; every
//! store-scoped route lives under `/api/v1/db/{database}`.

mod config;
mod cors;
mod error;
mod logging;
mod routes;
mod state;

pub use config::{Config, ConfigError, CorsConfig, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig};
pub use error::ApiError;
pub use logging::{LoggingError, init as init_logging};
pub use routes::router;
pub use state::{AppState, StateError};
