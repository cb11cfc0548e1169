use std::fmt;

/// Result type for Tabula operations
pub type Result<T> = std::result::Result<T, TabulaError>;

/// Main error type for the Tabula library
#[derive(Debug, Clone, PartialEq)]
pub enum TabulaError {
    /// Invalid configuration value, detected before training starts
    InvalidConfiguration {
        name: String,
        reason: String,
    },

    /// Loaded table shape disagrees with the configured dimensions/actions
    ShapeMismatch {
        expected: String,
        actual: String,
    },

    /// Observation length differs from the configured dimension count
    DimensionMismatch {
        expected: usize,
        actual: usize,
    },

    /// The environment collaborator failed
    Environment(String),

    /// Numerical computation errors
    NumericalError(String),

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),
}

impl fmt::Display for TabulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabulaError::InvalidConfiguration { name, reason } => {
                write!(f, "Invalid configuration '{}': {}", name, reason)
            }
            TabulaError::ShapeMismatch { expected, actual } => {
                write!(f, "Shape mismatch: expected {}, got {}", expected, actual)
            }
            TabulaError::DimensionMismatch { expected, actual } => {
                write!(f, "Observation has {} dimensions, expected {}", actual, expected)
            }
            TabulaError::Environment(msg) => write!(f, "Environment error: {}", msg),
            TabulaError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            TabulaError::IoError(msg) => write!(f, "IO error: {}", msg),
            TabulaError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for TabulaError {}

impl From<std::io::Error> for TabulaError {
    fn from(err: std::io::Error) -> Self {
        TabulaError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for TabulaError {
    fn from(err: bincode::Error) -> Self {
        TabulaError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for TabulaError {
    fn from(err: serde_json::Error) -> Self {
        TabulaError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl TabulaError {
    pub fn invalid_configuration<S: Into<String>>(name: S, reason: S) -> Self {
        TabulaError::InvalidConfiguration {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn shape_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        TabulaError::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn environment<S: Into<String>>(msg: S) -> Self {
        TabulaError::Environment(msg.into())
    }

    /// True for errors raised by configuration validation
    pub fn is_configuration(&self) -> bool {
        matches!(self, TabulaError::InvalidConfiguration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TabulaError::invalid_configuration("top_k", "must be at least 1");
        assert_eq!(err.to_string(), "Invalid configuration 'top_k': must be at least 1");
        assert!(err.is_configuration());

        let err = TabulaError::DimensionMismatch { expected: 8, actual: 3 };
        assert_eq!(err.to_string(), "Observation has 3 dimensions, expected 8");
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TabulaError = io.into();
        assert!(matches!(err, TabulaError::IoError(_)));
    }
}
