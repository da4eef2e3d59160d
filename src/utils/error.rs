use thiserror::Error;

#[derive(Error, Debug)]
pub enum DebtClearError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("PDF rendering error: {message}")]
    PdfError { message: String },

    #[error("Backend returned HTTP {status}: {body}")]
    ApiStatusError { status: u16, body: String },

    #[error("Optimizer reported failure: {message}")]
    BackendError { message: String },

    #[error("Email dispatch failed: {message}")]
    EmailError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("'{action}' is already in progress")]
    BusyError { action: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Backend,
    Input,
    Configuration,
    Export,
    Email,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DebtClearError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::ApiStatusError { .. } => ErrorCategory::Network,
            Self::BackendError { .. } => ErrorCategory::Backend,
            Self::ValidationError { .. } | Self::BusyError { .. } => ErrorCategory::Input,
            Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::PdfError { .. } | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorCategory::Export
            }
            Self::EmailError { .. } => ErrorCategory::Email,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BusyError { .. } => ErrorSeverity::Low,
            Self::ApiError(_)
            | Self::ApiStatusError { .. }
            | Self::BackendError { .. }
            | Self::EmailError { .. } => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Short message shown to the user in place of a blocking alert.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) | Self::ApiStatusError { .. } => {
                "Could not reach the optimization service. Please try again.".to_string()
            }
            Self::BackendError { message } => format!("Optimization failed: {}", message),
            Self::ValidationError { message } => message.clone(),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            Self::MissingConfigError { field } => format!("Missing setting '{}'", field),
            Self::ConfigValidationError { field, message } => {
                format!("Could not read settings ({}): {}", field, message)
            }
            Self::PdfError { .. } => "Error generating PDF. Please try again.".to_string(),
            Self::CsvError(_) | Self::SerializationError(_) => {
                "Error exporting your plan. Please try again.".to_string()
            }
            Self::EmailError { .. } => "Failed to send email. Please try again.".to_string(),
            Self::BusyError { action } => format!("Please wait, {} is still running.", action),
            Self::IoError(e) => format!("File system error: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the backend URL is correct and the service is running",
            ErrorCategory::Backend => "Review the debts you entered and submit again",
            ErrorCategory::Input => "Correct the highlighted input and submit again",
            ErrorCategory::Configuration => "Check the plan file and command-line flags",
            ErrorCategory::Export => "Check the output directory and retry the export",
            ErrorCategory::Email => "Check the email address and EmailJS settings, then resend",
            ErrorCategory::System => "Check file permissions and free disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, DebtClearError>;
