//! Error types for the Secret Santa service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific match-and-notify scenarios
#[derive(Debug, thiserror::Error)]
pub enum SantaError {
    #[error("Participant store request failed: {message}")]
    StoreRequestFailed { message: String },

    #[error("Slack token exchange failed: {message}")]
    TokenExchangeFailed { message: String },

    #[error("Message delivery failed: {message}")]
    DeliveryFailed { message: String },

    #[error("Missing OAuth code")]
    MissingOauthCode,

    #[error("A match run is already in progress")]
    RunInProgress,

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}
