//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! Secret Santa service, including environment variable loading,
//! TOML file loading, and validation.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub store: StoreSettings,
    pub slack: SlackSettings,
    pub delivery: DeliverySettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Port for the trigger/health/metrics endpoints
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Participant store (Airtable) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// API key used as a bearer token
    pub api_key: String,
    /// Base identifier the participant table lives in
    pub base_id: String,
    /// Table holding participant records
    pub table_name: String,
    /// View that lists signups
    pub view_name: String,
    /// REST API base URL (overridable for tests)
    pub api_base_url: String,
}

/// Slack channel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Pre-provisioned token; when present no OAuth exchange is needed
    pub preprovisioned_token: Option<String>,
    /// Pre-provisioned OAuth code for a headless first exchange
    pub oauth_code: Option<String>,
    /// Authorization URL users are redirected to
    pub auth_base_url: String,
    /// Web API base URL (overridable for tests)
    pub api_base_url: String,
}

/// Notification delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliverySettings {
    /// Minimum gap between consecutive message deliveries in milliseconds
    pub delivery_delay_ms: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "secret-santa".to_string(),
            log_level: "info".to_string(),
            http_port: 3000,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_id: String::new(),
            table_name: "Users".to_string(),
            view_name: "View all Signups".to_string(),
            api_base_url: "https://api.airtable.com/v0".to_string(),
        }
    }
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            preprovisioned_token: None,
            oauth_code: None,
            auth_base_url: "https://slack.com/oauth/v2/authorize".to_string(),
            api_base_url: "https://slack.com/api".to_string(),
        }
    }
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            delivery_delay_ms: 1000,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            config.service.http_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            config.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Store settings
        if let Ok(api_key) = env::var("AIRTABLE_API_KEY") {
            config.store.api_key = api_key;
        }
        if let Ok(base_id) = env::var("AIRTABLE_BASE_ID") {
            config.store.base_id = base_id;
        }
        if let Ok(table) = env::var("AIRTABLE_TABLE_NAME") {
            config.store.table_name = table;
        }
        if let Ok(view) = env::var("AIRTABLE_VIEW_NAME") {
            config.store.view_name = view;
        }
        if let Ok(url) = env::var("AIRTABLE_API_BASE_URL") {
            config.store.api_base_url = url;
        }

        // Slack settings
        if let Ok(client_id) = env::var("SLACK_CLIENT_ID") {
            config.slack.client_id = client_id;
        }
        if let Ok(client_secret) = env::var("SLACK_CLIENT_SECRET") {
            config.slack.client_secret = client_secret;
        }
        if let Ok(redirect_uri) = env::var("SLACK_REDIRECT_URI") {
            config.slack.redirect_uri = redirect_uri;
        }
        if let Ok(token) = env::var("SLACK_HARDCODED_TOKEN") {
            config.slack.preprovisioned_token = Some(token);
        }
        if let Ok(code) = env::var("SLACK_OAUTH_CODE") {
            config.slack.oauth_code = Some(code);
        }
        if let Ok(url) = env::var("SLACK_AUTH_BASE_URL") {
            config.slack.auth_base_url = url;
        }
        if let Ok(url) = env::var("SLACK_API_BASE_URL") {
            config.slack.api_base_url = url;
        }

        // Delivery settings
        if let Ok(delay) = env::var("DELIVERY_DELAY_MS") {
            config.delivery.delivery_delay_ms = delay
                .parse()
                .map_err(|_| anyhow!("Invalid DELIVERY_DELAY_MS value: {}", delay))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        let config = Self::from_toml_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("Failed to parse config file")?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Get inter-delivery delay as Duration
    pub fn delivery_delay(&self) -> Duration {
        Duration::from_millis(self.delivery.delivery_delay_ms)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate ports
    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }

    // Validate timeouts
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    // Validate store settings
    if config.store.table_name.is_empty() {
        return Err(anyhow!("Store table name cannot be empty"));
    }
    if config.store.api_base_url.is_empty() {
        return Err(anyhow!("Store API base URL cannot be empty"));
    }

    // Validate Slack settings
    if config.slack.auth_base_url.is_empty() {
        return Err(anyhow!("Slack authorization URL cannot be empty"));
    }
    if config.slack.api_base_url.is_empty() {
        return Err(anyhow!("Slack API base URL cannot be empty"));
    }

    Ok(())
}
