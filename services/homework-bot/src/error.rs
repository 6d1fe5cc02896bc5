//! Error types for the homework bot

/// Errors that can occur in the homework bot
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Request to the homework endpoint failed (params: {params}): {reason}")]
    EndpointRequest { params: String, reason: String },

    #[error("Homework endpoint unavailable: {status} {reason}: {body}")]
    EndpointUnavailable {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("API response is not a JSON object: {0}")]
    ResponseType(String),

    #[error("API response contains no data")]
    EmptyData,

    #[error("Key \"{key}\" is missing, found keys: {found:?}")]
    MissingKey { key: String, found: Vec<String> },

    #[error("Value under \"homeworks\" is not a list")]
    HomeworkType,

    #[error("Unknown homework status \"{status}\", expected one of: {known:?}")]
    UnknownStatus { status: String, known: Vec<String> },

    #[error("Failed to send message \"{message}\": {reason}")]
    SendMessage { message: String, reason: String },

    #[error("Notifier error: {0}")]
    Notifier(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for homework bot operations
pub type Result<T> = std::result::Result<T, BotError>;
