use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Store directory unavailable: {reason}")]
    ServiceUnavailable { reason: String },

    #[error("Image fetch failed for '{image_ref}': {reason}")]
    FetchFailed { image_ref: String, reason: String },

    #[error("Invalid store data: {message}")]
    InvalidStore { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),
}

impl LocatorError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            reason: reason.into(),
        }
    }

    pub fn fetch_failed(image_ref: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            image_ref: image_ref.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_store(message: impl Into<String>) -> Self {
        Self::InvalidStore {
            message: message.into(),
        }
    }

    /// Errors caused by an unreachable collaborator rather than bad input.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable { .. } | Self::FetchFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LocatorError>;
