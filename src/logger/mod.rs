//! Logger module
//!
//! Logging facade for the server, backed by `tracing`:
//! - Startup banner and lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LogFormat, LoggingConfig};
use crate::error::ServerError;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Target used for access log lines so they can be filtered separately
pub const ACCESS_TARGET: &str = "monocle::access";

const BANNER: &str = r"
╔══════════════════════════════════════╗
║         MONOCLE API SERVER           ║
║      Connect. Engage. Earn.          ║
╚══════════════════════════════════════╝
";

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ServerError::Logging(format!("invalid log level '{}': {e}", config.level)))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
    };
    result.map_err(|e| ServerError::Logging(e.to_string()))
}

/// Print the startup banner to stdout
pub fn print_banner() {
    println!("{BANNER}");
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    let port = addr.port();
    tracing::info!(
        %addr,
        environment = %config.app.environment,
        "🚀 {} API Server starting on http://localhost:{port}",
        config.app.name
    );
    tracing::info!("📍 Health check: http://localhost:{port}/health");
    tracing::info!("📂 Serving web frontend from {}", config.static_files.root);
    if let Some(workers) = config.server.workers {
        tracing::info!(workers, "Worker threads configured");
    }
    if let Some(max) = config.performance.max_connections {
        tracing::info!(max_connections = max, "Connection limit enabled");
    }
}

pub fn log_server_ready(addr: &SocketAddr) {
    tracing::info!(%addr, "Server ready, accepting connections");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(%peer_addr, "Connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    tracing::warn!(error = %err, "Failed to serve connection");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(
        target: ACCESS_TARGET,
        status = entry.status,
        request_time_us = entry.request_time_us,
        "{}",
        entry.format(format)
    );
}

pub fn log_shutdown_requested(signal: &str) {
    tracing::info!(signal, "Shutdown requested, no longer accepting connections");
}

pub fn log_shutdown_complete(remaining: usize) {
    if remaining == 0 {
        tracing::info!("All connections closed, server stopped");
    } else {
        tracing::warn!(
            remaining,
            "Grace period elapsed, stopping with connections still open"
        );
    }
}

pub fn log_bind_failed(addr: &SocketAddr, err: &std::io::Error) {
    tracing::error!(%addr, error = %err, "❌ Server failed to start");
}
