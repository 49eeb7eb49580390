//! Server configuration shared by the services
//!
//! Values come from built-in defaults, overridden by environment variables
//! carrying the service prefix (e.g. `ORDERS_PORT=8080`).

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::ConfigError;

/// Address the HTTP server binds to
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load the configuration for the service identified by `prefix`
    ///
    /// # Environment Variables
    /// - `<PREFIX>_HOST`: Bind host (default: "0.0.0.0")
    /// - `<PREFIX>_PORT`: Bind port (default: `default_port`)
    pub fn load(prefix: &str, default_port: u16) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
