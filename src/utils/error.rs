use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed at {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Knowledge base unavailable: {message}")]
    DataUnavailable { message: String },

    #[error("Generalist answerer failed: {0}")]
    Upstream(#[from] UpstreamFailure),

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

/// Failures of the external language-model call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamFailure {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("service returned no text")]
    Empty,

    #[error("no answer within {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for UpstreamFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamFailure::Malformed(err.to_string())
        } else {
            UpstreamFailure::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Upstream,
    Request,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AssistantError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AssistantError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AssistantError::ConfigError { .. }
            | AssistantError::MissingConfigError { .. }
            | AssistantError::InvalidConfigValueError { .. }
            | AssistantError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            AssistantError::DataUnavailable { .. } | AssistantError::SerializationError(_) => {
                ErrorCategory::Data
            }
            AssistantError::ApiError(_) | AssistantError::Upstream(_) => ErrorCategory::Upstream,
            AssistantError::InvalidRequest { .. } => ErrorCategory::Request,
            AssistantError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // Rejected before any work is done; the process keeps serving.
            ErrorCategory::Request => ErrorSeverity::Low,
            ErrorCategory::Data | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AssistantError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            AssistantError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            AssistantError::ConfigError { message }
            | AssistantError::ConfigValidationError { message, .. } => {
                format!("Configuration problem: {}", message)
            }
            AssistantError::DataUnavailable { .. } | AssistantError::SerializationError(_) => {
                "The campus knowledge base could not be read".to_string()
            }
            AssistantError::ApiError(_) | AssistantError::Upstream(_) => {
                "The AI service could not be reached".to_string()
            }
            AssistantError::InvalidRequest { message } => message.clone(),
            AssistantError::IoError(e) => format!("File system error: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AssistantError::MissingConfigError { field } if field.contains("api_key") => {
                "Set the GEMINI_API_KEY environment variable or generalist.api_key in the config file"
                    .to_string()
            }
            AssistantError::MissingConfigError { .. }
            | AssistantError::InvalidConfigValueError { .. }
            | AssistantError::ConfigValidationError { .. }
            | AssistantError::ConfigError { .. } => {
                "Check the configuration file against the documented sections".to_string()
            }
            AssistantError::DataUnavailable { .. } | AssistantError::SerializationError(_) => {
                "Make sure the knowledge file exists and is valid JSON".to_string()
            }
            AssistantError::ApiError(_) | AssistantError::Upstream(_) => {
                "Check network access and the API quota, then retry".to_string()
            }
            AssistantError::InvalidRequest { .. } => "Send a non-empty query".to_string(),
            AssistantError::IoError(_) => "Check file paths and permissions".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
