//! Error handling for FlowCal
//!
//! Provides error types for all layers of the generator:
//! - Parameter errors (operator-supplied calibration values)
//! - Generation errors (toolpath synthesis and serialization)
//! - I/O and serialization errors (file boundary)
//!
//! All error types use `thiserror` for ergonomic error handling.
//! Analysis of the base file never produces a hard error: missing
//! geometry degrades to documented defaults and is only logged.

use thiserror::Error;

/// Errors related to operator-supplied calibration parameters.
#[derive(Error, Debug, Clone)]
pub enum ParameterError {
    /// A required parameter is missing.
    #[error("Missing required parameter: {0}")]
    Missing(String),

    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Main error type for FlowCal
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// A parameter validation error occurred.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// G-code generation failed.
    #[error("G-code generation failed: {0}")]
    GenerationFailed(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a parameter validation error
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, Error::Parameter(_))
    }

    /// Check if this is an I/O error
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = std::result::Result<T, ParameterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_error_display() {
        let err = ParameterError::OutOfRange {
            name: "layer_height".to_string(),
            value: -0.2,
            min: 0.0,
            max: 100.0,
        };
        assert_eq!(
            err.to_string(),
            "Parameter 'layer_height' out of range: -0.2 (valid: 0..100)"
        );

        let err = ParameterError::InvalidValue {
            name: "section_height".to_string(),
            reason: "must be strictly positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for 'section_height': must be strictly positive"
        );

        let err = ParameterError::Missing("cylinder_diameter".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required parameter: cylinder_diameter"
        );
    }

    #[test]
    fn test_error_conversion() {
        let param_err = ParameterError::Missing("nozzle_diameter".to_string());
        let err: Error = param_err.into();
        assert!(err.is_parameter_error());

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.is_io_error());
        assert!(!err.is_parameter_error());
    }

    #[test]
    fn test_generation_error_display() {
        let err = Error::GenerationFailed("empty toolpath".to_string());
        assert_eq!(err.to_string(), "G-code generation failed: empty toolpath");

        let err = Error::other("unexpected state");
        assert_eq!(err.to_string(), "unexpected state");
    }
}
