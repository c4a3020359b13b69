use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("GraphQL error: {message}")]
    GraphqlError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::ApiError(_) | SyncError::GraphqlError { .. } => ErrorCategory::Network,
            SyncError::MissingConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            SyncError::CsvError(_)
            | SyncError::SerializationError(_)
            | SyncError::ProcessingError { .. } => ErrorCategory::Data,
            SyncError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 配置錯誤在啟動時是致命的
            SyncError::MissingConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::ConfigValidationError { .. } => ErrorSeverity::Critical,
            SyncError::ApiError(_) | SyncError::GraphqlError { .. } => ErrorSeverity::Medium,
            SyncError::CsvError(_)
            | SyncError::SerializationError(_)
            | SyncError::ProcessingError { .. } => ErrorSeverity::High,
            SyncError::IoError(_) => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SyncError::ApiError(_) => {
                "Check network connectivity and that the remote endpoint is reachable".to_string()
            }
            SyncError::GraphqlError { .. } => {
                "Check the access token scopes and the Admin API version".to_string()
            }
            SyncError::CsvError(_) => {
                "Check the CSV delimiter and column headers against the vendor profile".to_string()
            }
            SyncError::IoError(_) => "Check that the input file exists and is readable".to_string(),
            SyncError::SerializationError(_) => {
                "The remote API returned an unexpected payload shape".to_string()
            }
            SyncError::MissingConfigError { field } => {
                format!("Set the {} environment variable before running", field)
            }
            SyncError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' and retry", field)
            }
            SyncError::ConfigValidationError { field, .. } => {
                format!("Review the '{}' setting in the vendor profile", field)
            }
            SyncError::ProcessingError { .. } => {
                "Inspect the offending source row in the feed".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Remote API problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Source data problem: {}", self),
            ErrorCategory::Io => format!("File problem: {}", self),
        }
    }
}
