use thiserror::Error;

/// Core error types for host spec construction and normalization
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Host validation failed: {0}")]
    Validation(String),

    #[error("Invalid property value: {0}")]
    InvalidValue(String),
}

impl CoreError {
    /// Create a new Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new InvalidValue error
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::InvalidValue(_) => ErrorCategory::InvalidValue,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    InvalidValue,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::InvalidValue => write!(f, "invalid_value"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = CoreError::validation("hostname is required");
        assert_eq!(err.to_string(), "Host validation failed: hostname is required");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_invalid_value_error() {
        let err = CoreError::invalid_value("munge_boolean only takes booleans");
        assert_eq!(
            err.to_string(),
            "Invalid property value: munge_boolean only takes booleans"
        );
        assert_eq!(err.category(), ErrorCategory::InvalidValue);
    }

    #[test]
    fn test_error_categories_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::InvalidValue.to_string(), "invalid_value");
    }

    #[test]
    fn test_error_debug_format() {
        let err = CoreError::validation("test message");
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("Validation"));
        assert!(debug_str.contains("test message"));
    }

    #[test]
    fn test_result_type_usage() {
        fn ok_case() -> Result<String> {
            Ok("success".to_string())
        }

        fn err_case() -> Result<String> {
            Err(CoreError::invalid_value("bad"))
        }

        assert!(ok_case().is_ok());
        assert!(err_case().is_err());
    }
}
