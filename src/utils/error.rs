use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Authorization error: {message}")]
    AuthError { message: String },

    #[error("Folder walk error: {message}")]
    FolderWalkError { message: String },

    #[error("Failed to retrieve {resource}: {message}")]
    FetchError { resource: String, message: String },

    #[error("Length mismatch: {files} audited files but {results} audit results")]
    LengthMismatch { files: usize, results: usize },

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Network,
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

impl FeedError {
    pub fn auth(message: impl Into<String>) -> Self {
        Self::AuthError {
            message: message.into(),
        }
    }

    pub fn folder_walk(message: impl Into<String>) -> Self {
        Self::FolderWalkError {
            message: message.into(),
        }
    }

    pub fn fetch(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FetchError {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthError { .. } => ErrorCategory::Authentication,
            Self::FetchError { .. } | Self::HttpClientError(_) => ErrorCategory::Network,
            Self::FolderWalkError { .. }
            | Self::LengthMismatch { .. }
            | Self::CsvError(_)
            | Self::SerializationError(_) => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::ZipError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Authentication | ErrorCategory::Data | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::AuthError { .. } => {
                "Check the API key and secret, and that they belong to the selected environment"
            }
            Self::FolderWalkError { .. } => {
                "Check the folder type and subfolder name; try --subfolder-scan exhaustive"
            }
            Self::FetchError { .. } | Self::HttpClientError(_) => {
                "Check network connectivity and the API base URL, then run again"
            }
            Self::LengthMismatch { .. } => {
                "The audit API returned an unexpected number of results; run again or contact the API provider"
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration value and run again",
            Self::IoError(_) | Self::ZipError(_) => {
                "Check that the output path exists and is writable"
            }
            Self::CsvError(_) | Self::SerializationError(_) => {
                "The data could not be encoded; run with --verbose for details"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::AuthError { .. } => "Could not sign in to the audit API".to_string(),
            Self::FolderWalkError { message } => format!("Folder lookup failed: {}", message),
            Self::FetchError { resource, .. } => format!("Could not download {}", resource),
            Self::LengthMismatch { files, results } => format!(
                "Audit results do not line up with files ({} files, {} results)",
                files, results
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
