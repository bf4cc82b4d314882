//! Error types for the apex-quaternion library
//!
//! This module provides the main error and result types used throughout the library.
//! All errors use the `thiserror` crate for automatic trait implementations.
//!
//! Note that only the mutating and extracting operations report errors. Scalar
//! division by zero and [`Quaternion::inverse`](crate::Quaternion::inverse) fall
//! back to the zero quaternion instead.

use std::num::ParseFloatError;
use thiserror::Error;

/// Main result type used throughout the apex-quaternion library
pub type QuaternionResult<T> = Result<T, QuaternionError>;

/// Main error type for the apex-quaternion library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuaternionError {
    /// The quaternion has (numerically) zero length and has no multiplicative inverse
    #[error("Zero quaternion cannot be inverted")]
    NotInvertible,

    /// The quaternion has (numerically) zero length and cannot be scaled to unit length
    #[error("Zero quaternion cannot be unitized")]
    ZeroLength,

    /// Axis-angle or frame extraction from a quaternion that does not define a rotation
    #[error("Degenerate rotation: {0}")]
    DegenerateRotation(String),

    /// Frame axes that are zero or parallel
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<ParseFloatError> for QuaternionError {
    fn from(err: ParseFloatError) -> Self {
        QuaternionError::InvalidInput(format!("Failed to parse float: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quaternion_error_display() {
        assert_eq!(
            QuaternionError::NotInvertible.to_string(),
            "Zero quaternion cannot be inverted"
        );

        let error = QuaternionError::DegenerateRotation("vector part is zero".to_string());
        assert_eq!(error.to_string(), "Degenerate rotation: vector part is zero");
    }

    #[test]
    fn test_quaternion_error_from_parse_float() {
        let parse_error = "1.x".parse::<f64>().unwrap_err();
        let error = QuaternionError::from(parse_error);

        match error {
            QuaternionError::InvalidInput(msg) => assert!(msg.contains("Failed to parse float")),
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_quaternion_result_err() {
        let result: QuaternionResult<f64> = Err(QuaternionError::ZeroLength);
        assert!(result.is_err());
    }
}
