//! Configuration management for PMS Core

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Logging and metrics configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to log output
    pub service_name: String,
    /// "json" or "pretty"
    pub log_format: String,
    /// Whether to install the Prometheus recorder
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "pms-core".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = TelemetryConfig::default();

        let log_format = lookup("LOG_FORMAT")
            .map(|v| v.trim().to_lowercase())
            .unwrap_or(defaults.log_format);
        if log_format != "json" && log_format != "pretty" {
            anyhow::bail!("Invalid LOG_FORMAT '{}': expected json or pretty", log_format);
        }

        let metrics_enabled = match lookup("METRICS_ENABLED") {
            Some(value) => value
                .trim()
                .parse::<bool>()
                .context("Invalid METRICS_ENABLED")?,
            None => defaults.metrics_enabled,
        };

        Ok(Self {
            telemetry: TelemetryConfig {
                service_name: lookup("PMS_SERVICE_NAME").unwrap_or(defaults.service_name),
                log_format,
                metrics_enabled,
            },
        })
    }
}
