// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

// Re-export public types
pub use state::{AppState, StartTime};
pub use types::{
    AppConfig, Config, HttpConfig, LogFormat, LoggingConfig, PerformanceConfig, ServerConfig,
    StaticConfig,
};

/// Prefix for layered environment overrides, e.g. `MONOCLE_STATIC__ROOT`
const ENV_PREFIX: &str = "MONOCLE";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// and the process environment
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        let env: config::Map<String, String> = std::env::vars().collect();
        Self::load_with_env(Some(config_path), env)
    }

    /// Load configuration from an optional file and an explicit environment map
    ///
    /// Precedence (lowest first): built-in defaults, file, `MONOCLE_*` variables,
    /// then the deployment variables `PORT` and `ENV`.
    pub fn load_with_env(
        config_path: Option<&str>,
        env: config::Map<String, String>,
    ) -> Result<Self, ServerError> {
        let port = non_empty(env.get("PORT"));
        let environment = non_empty(env.get("ENV"));

        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("app.name", "Monocle")?
            .set_default("app.version", "1.0.0")?
            .set_default("app.environment", "development")?
            .set_default("static.root", "./public")?
            .set_default("static.index_files", vec!["index.html"])?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 60)?
            .set_default("performance.shutdown_grace_period", 10)?
            .set_default("http.server_name", "Monocle/1.0")?
            .set_default("http.max_body_size", 1_048_576)?; // 1MB

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(env)),
            )
            .set_override_option("server.port", port)?
            .set_override_option("app.environment", environment)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|e| ServerError::InvalidAddress {
            reason: format!("{e}"),
            addr,
        })
    }
}

/// Deployment platforms sometimes export empty variables; treat them as unset
fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}
