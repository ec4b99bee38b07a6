use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectionsError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Map unavailable: {reason}")]
    MapUnavailable { reason: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl ConnectionsError {
    /// Short text suitable for showing in place of results.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ConnectionsError::ApiError(e) if e.is_timeout() => {
                "The server took too long to respond".to_string()
            }
            ConnectionsError::ApiError(e) if e.is_decode() => {
                "The server sent a response that could not be read".to_string()
            }
            ConnectionsError::ApiError(_) => "Could not reach the server".to_string(),
            ConnectionsError::HttpStatus { status: 404, .. } => "Company not found".to_string(),
            ConnectionsError::HttpStatus { status, .. } => {
                format!("The server returned an error ({})", status)
            }
            ConnectionsError::SerializationError(_) => {
                "The server sent a response that could not be read".to_string()
            }
            ConnectionsError::MapUnavailable { reason } => {
                format!("Map could not be loaded: {}", reason)
            }
            other => other.to_string(),
        }
    }

    /// Whether the failure came from talking to the backend.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ConnectionsError::ApiError(_) | ConnectionsError::HttpStatus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ConnectionsError>;
