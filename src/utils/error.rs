use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShortenerError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },

    #[error("Short code not found: {short_code}")]
    NotFound { short_code: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ShortenerError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(_) => ErrorCategory::Network,
            Self::Api { .. } | Self::NotFound { .. } => ErrorCategory::Api,
            Self::MalformedResponse { .. }
            | Self::Serialization(_)
            | Self::Csv(_)
            | Self::ValidationError { .. } => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路或後端 5xx 屬於可重試錯誤
            Self::Network(_) => ErrorSeverity::Medium,
            Self::Api { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            Self::Api { .. }
            | Self::NotFound { .. }
            | Self::MalformedResponse { .. }
            | Self::Serialization(_)
            | Self::Csv(_)
            | Self::ValidationError { .. }
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::Io(_) => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Is the backend running?".to_string(),
            Self::Api {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Api { .. } => "Something went wrong".to_string(),
            Self::NotFound { short_code } => {
                format!("Short code '{}' does not exist", short_code)
            }
            Self::MalformedResponse { .. } | Self::Serialization(_) => {
                "Something went wrong".to_string()
            }
            Self::Io(e) => format!("File system error: {}", e),
            Self::Csv(e) => format!("Could not process CSV data: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the backend is reachable at the configured --api-base",
            ErrorCategory::Api => "Check the input value; the backend rejected the request",
            ErrorCategory::Data => "The backend answered with an unexpected body; check --route-style",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::System => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, ShortenerError>;
