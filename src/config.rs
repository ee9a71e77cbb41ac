// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the service.
//! Every setting has a default, so an empty environment is valid.

use anyhow::{Context, Result};
use std::net::SocketAddr;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: server::ServerConfig,
}

impl AppConfig {
    /// Loads application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if the configured bind address is not valid.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            server: server::ServerConfig::from_env()?,
        })
    }
}

// ============================================================
// Server configuration
// ============================================================

mod server {
    // ---
    use super::*;

    /// Listener configuration.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Interface to bind. Defaults to `0.0.0.0`.
        pub host: String,

        /// TCP port to listen on. Defaults to 3000.
        pub port: u16,
    }

    impl ServerConfig {
        /// Builds a [`ServerConfig`] from `HOST` and `PORT`.
        ///
        /// An unparsable `PORT` falls back to the default.
        pub fn from_env() -> Result<Self> {
            // ---
            let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
            let port = optional_env_parse!("PORT", u16, 3000);

            let config = Self { host, port };
            config.bind_addr()?;
            Ok(config)
        }

        /// Socket address to bind the listener to.
        pub fn bind_addr(&self) -> Result<SocketAddr> {
            // ---
            format!("{}:{}", self.host, self.port)
                .parse()
                .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
        }
    }
}
pub use server::ServerConfig;

// ============================================================
// Tests
// ============================================================
