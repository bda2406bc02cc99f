//! Error types for the webhook notifier

/// Errors that can occur while turning state changes into webhook deliveries
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Resource resolution failed: {0}")]
    Resolution(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for webhook notifier operations
pub type Result<T> = std::result::Result<T, WebhookError>;
