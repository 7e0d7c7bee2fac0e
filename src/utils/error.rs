use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CaseApiError {
    #[error("Case ID '{0}' is not a valid UUID")]
    InvalidIdentifier(String),

    #[error("UPRN '{0}' not found")]
    PropertyRefNotFound(String),

    #[error("Case ID '{0}' not found")]
    CaseIdNotFound(Uuid),

    #[error("Case reference '{0}' not found")]
    CaseReferenceNotFound(i64),

    #[error("QID '{0}' not found")]
    QidNotFound(String),

    #[error("UAC QID link for QID '{0}' has no case")]
    LinkHasNoCase(String),

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    NotFound,
    Transport,
    Storage,
    Configuration,
}

impl CaseApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CaseApiError::InvalidIdentifier(_) => ErrorCategory::InvalidInput,
            CaseApiError::PropertyRefNotFound(_)
            | CaseApiError::CaseIdNotFound(_)
            | CaseApiError::CaseReferenceNotFound(_)
            | CaseApiError::QidNotFound(_)
            | CaseApiError::LinkHasNoCase(_) => ErrorCategory::NotFound,
            CaseApiError::Transport { .. } | CaseApiError::HttpError(_) => {
                ErrorCategory::Transport
            }
            CaseApiError::Storage { .. } => ErrorCategory::Storage,
            CaseApiError::IoError(_)
            | CaseApiError::SerializationError(_)
            | CaseApiError::ConfigError { .. }
            | CaseApiError::ConfigValidationError { .. }
            | CaseApiError::InvalidConfigValueError { .. }
            | CaseApiError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// HTTP status the invoking API layer reports for this error.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::InvalidInput => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Transport => 502,
            ErrorCategory::Storage | ErrorCategory::Configuration => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, CaseApiError>;
