//! Configuration management for the Inventory Management Console
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with IMC_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Record gateway configuration
    pub gateway: GatewayConfig,

    /// Low-stock alert configuration
    pub alerts: AlertConfig,

    /// Dashboard configuration
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Base URL of the hosted record API
    pub base_url: String,

    /// Project identifier sent with every request
    pub project_id: String,

    /// API key for the record API
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Page size used when loading full collections
    pub page_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertConfig {
    /// Name of the serverless function that sends the low-stock email
    pub low_stock_function: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// How many recent movements the dashboard shows
    pub recent_movement_limit: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("IMC_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("gateway.base_url", "")?
            .set_default("gateway.project_id", "")?
            .set_default("gateway.api_key", "")?
            .set_default("gateway.timeout_seconds", 30)?
            .set_default("gateway.page_size", 200)?
            .set_default("alerts.low_stock_function", "send-low-stock-alert")?
            .set_default("dashboard.recent_movement_limit", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (IMC_ prefix)
            .add_source(
                Environment::with_prefix("IMC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
