use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
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

    #[error("Invalid attribute '{attribute}' on element '{element}': {reason}")]
    AttributeError {
        element: String,
        attribute: String,
        reason: String,
    },

    #[error("Host capability unavailable: {capability}")]
    HostError { capability: String },

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Markup,
    Host,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::ConfigError { .. }
            | SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SiteError::AttributeError { .. } => ErrorCategory::Markup,
            SiteError::HostError { .. } => ErrorCategory::Host,
            SiteError::IoError(_) | SiteError::SerializationError(_) | SiteError::TaskError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一元素標記錯誤只會跳過該元素
            ErrorCategory::Markup => ErrorSeverity::Low,
            ErrorCategory::Host => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::IoError(e) => format!("Could not read or write a file: {}", e),
            SiteError::SerializationError(e) => format!("Stored data is not valid JSON: {}", e),
            SiteError::ConfigError { message } => format!("Configuration problem: {}", message),
            SiteError::ConfigValidationError { field, message } => {
                format!("Setting '{}' is invalid: {}", field, message)
            }
            SiteError::InvalidConfigValueError { field, value, reason } => {
                format!("Setting '{}' has an invalid value '{}': {}", field, value, reason)
            }
            SiteError::MissingConfigError { field } => {
                format!("Setting '{}' is required but was not provided", field)
            }
            SiteError::AttributeError {
                element,
                attribute,
                reason,
            } => format!("Element '{}' has a bad '{}' attribute: {}", element, attribute, reason),
            SiteError::HostError { capability } => {
                format!("The host page does not provide '{}'", capability)
            }
            SiteError::TaskError(e) => format!("An animation task stopped unexpectedly: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the site configuration file and environment variables",
            ErrorCategory::Markup => "Fix the counter-* attributes on the element",
            ErrorCategory::Host => "Run inside a host that provides the missing capability",
            ErrorCategory::System => "Check file permissions and stored session data",
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_errors_are_low_severity() {
        let err = SiteError::AttributeError {
            element: "stat-1".to_string(),
            attribute: "counter-target".to_string(),
            reason: "missing".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Markup);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().contains("stat-1"));
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = SiteError::MissingConfigError {
            field: "gate.password".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("gate.password"));
    }
}
