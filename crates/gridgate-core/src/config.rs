//! Gateway configuration.
//!
//! Provides [`GatewayConfig`] for configuring the gateway's backend
//! connection and pool. Configuration values are loaded from environment
//! variables via [`GatewayConfig::from_env`].

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::client::ConnectOptions;
use crate::pool::DEFAULT_POOL_SIZE;

/// Gateway configuration.
///
/// All fields have defaults suitable for a local backend instance.
///
/// # Examples
///
/// ```
/// use gridgate_core::config::GatewayConfig;
///
/// let config = GatewayConfig::default();
/// assert_eq!(config.port, 1247);
/// assert_eq!(config.pool_size, 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Backend host.
    #[builder(default = String::from("localhost"))]
    pub host: String,

    /// Backend port.
    #[builder(default = 1247)]
    pub port: u16,

    /// Backend zone name.
    #[builder(default = String::from("tempZone"))]
    pub zone: String,

    /// Account name used for authentication.
    #[builder(default = String::from("rods"))]
    pub username: String,

    /// Account password used for authentication.
    #[builder(default = String::from("rods"))]
    pub password: String,

    /// Absolute path of the mount collection all buckets live under.
    #[builder(default = String::from("/tempZone/home/rods"))]
    pub mount: String,

    /// Number of sessions the pool holds. Fixed for the gateway's lifetime.
    #[builder(default = DEFAULT_POOL_SIZE)]
    pub pool_size: usize,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: 1247,
            zone: String::from("tempZone"),
            username: String::from("rods"),
            password: String::from("rods"),
            mount: String::from("/tempZone/home/rods"),
            pool_size: DEFAULT_POOL_SIZE,
            log_level: String::from("info"),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GRIDGATE_HOST` | `localhost` |
    /// | `GRIDGATE_PORT` | `1247` |
    /// | `GRIDGATE_ZONE` | `tempZone` |
    /// | `ACCESS_KEY` | `rods` |
    /// | `SECRET_KEY` | `rods` |
    /// | `GRIDGATE_MOUNT` | `/tempZone/home/rods` |
    /// | `GRIDGATE_POOL_SIZE` | `4` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// # Examples
    ///
    /// ```
    /// use gridgate_core::config::GatewayConfig;
    ///
    /// let config = GatewayConfig::from_env();
    /// assert!(!config.host.is_empty());
    /// ```
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("GRIDGATE_HOST") {
            config.host = v;
        }
        if let Ok(v) = std::env::var("GRIDGATE_PORT") {
            if let Ok(n) = v.parse::<u16>() {
                config.port = n;
            }
        }
        if let Ok(v) = std::env::var("GRIDGATE_ZONE") {
            config.zone = v;
        }
        if let Ok(v) = std::env::var("ACCESS_KEY") {
            config.username = v;
        }
        if let Ok(v) = std::env::var("SECRET_KEY") {
            config.password = v;
        }
        if let Ok(v) = std::env::var("GRIDGATE_MOUNT") {
            config.mount = v;
        }
        if let Ok(v) = std::env::var("GRIDGATE_POOL_SIZE") {
            if let Ok(n) = v.parse::<usize>() {
                if n > 0 {
                    config.pool_size = n;
                }
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// The connection parameters derived from this configuration.
    #[must_use]
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            host: self.host.clone(),
            port: self.port,
            zone: self.zone.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            mount: self.mount.clone(),
        }
    }
}
