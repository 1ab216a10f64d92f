use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoderError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("CSV file must contain {} columns (missing: {})", .required.join(", "), .missing.join(", "))]
    SchemaValidationError {
        required: Vec<String>,
        missing: Vec<String>,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Configuration,
    Output,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CoderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CoderError::ApiError(_) => ErrorCategory::Network,
            CoderError::CsvError(_) | CoderError::SchemaValidationError { .. } => {
                ErrorCategory::Input
            }
            CoderError::ConfigError { .. }
            | CoderError::MissingConfigError { .. }
            | CoderError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CoderError::IoError(_) | CoderError::SerializationError(_) => ErrorCategory::Output,
            CoderError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoderError::ApiError(_) => ErrorSeverity::Medium,
            CoderError::CsvError(_)
            | CoderError::SchemaValidationError { .. }
            | CoderError::ConfigError { .. }
            | CoderError::MissingConfigError { .. }
            | CoderError::InvalidConfigValueError { .. }
            | CoderError::ProcessingError { .. } => ErrorSeverity::High,
            CoderError::IoError(_) | CoderError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CoderError::ApiError(e) => format!("Could not reach the model service: {}", e),
            CoderError::CsvError(e) => format!("Error loading CSV file: {}", e),
            CoderError::SchemaValidationError { required, .. } => {
                format!("CSV file must contain {} columns.", quoted(required))
            }
            CoderError::IoError(e) => format!("File operation failed: {}", e),
            CoderError::SerializationError(e) => format!("Could not serialize results: {}", e),
            CoderError::ConfigError { message } => format!("Configuration problem: {}", message),
            CoderError::MissingConfigError { field } => {
                format!("Required setting '{}' was not provided", field)
            }
            CoderError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            CoderError::ProcessingError { message } => format!("Processing failed: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Make sure the Ollama server is running and the endpoint is correct",
            ErrorCategory::Input => "Check that the CSV has a header row with the id and text columns",
            ErrorCategory::Configuration => "Run with --help to review the available options",
            ErrorCategory::Output => "Check that the output path exists and is writable",
            ErrorCategory::Processing => "Re-run with --verbose for more details",
        }
    }
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(" and ")
}

pub type Result<T> = std::result::Result<T, CoderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_message_names_columns() {
        let err = CoderError::SchemaValidationError {
            required: vec!["id".to_string(), "text".to_string()],
            missing: vec!["text".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "CSV file must contain id, text columns (missing: text)"
        );
        assert_eq!(
            err.user_friendly_message(),
            "CSV file must contain 'id' and 'text' columns."
        );
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = CoderError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::Output);
    }
}
