//! Configuration management for the Secret Santa service
//!
//! This module handles all configuration loading from environment variables
//! or a TOML file, validation, and default values.

pub mod app;

// Re-export commonly used types
pub use app::{
    validate_config, AppConfig, DeliverySettings, ServiceSettings, SlackSettings, StoreSettings,
};
