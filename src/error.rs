//! Error types for local-refine
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

use crate::testcase::ValueKind;

/// Error type for invalid search configurations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The sensitivity probe count must be at least one
    #[error("probe_attempts must be at least 1")]
    ZeroProbeAttempts,

    /// The candidate character range is empty
    #[error("empty character range: [{min:?}, {max:?})")]
    EmptyCharacterRange {
        /// Inclusive lower bound of the range
        min: char,
        /// Exclusive upper bound of the range
        max: char,
    },

    /// Randomized strings must be allowed at least one character
    #[error("random_string_max_len must be at least 1")]
    ZeroRandomStringLength,

    /// Float refinement needs at least one fractional precision step
    #[error("float_precision_steps must be at least 1")]
    ZeroPrecisionSteps,
}

/// Error type for statement access on a test case
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatementError {
    /// Statement index past the end of the test case
    #[error("statement index {index} out of range for test case of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// Statement holds a value of a different kind than requested
    #[error("statement {index} holds a {actual} value, expected {expected}")]
    KindMismatch {
        index: usize,
        expected: ValueKind,
        actual: ValueKind,
    },
}

/// Top-level error type for refinement operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Statement access error
    #[error("statement error: {0}")]
    Statement(#[from] StatementError),
}

/// Result type alias for refinement operations
pub type SearchResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::EmptyCharacterRange { min: 'z', max: 'a' };
        assert_eq!(err.to_string(), "empty character range: ['z', 'a')");

        let err = ConfigError::ZeroProbeAttempts;
        assert_eq!(err.to_string(), "probe_attempts must be at least 1");
    }

    #[test]
    fn test_statement_error_display() {
        let err = StatementError::OutOfRange { index: 5, len: 3 };
        assert_eq!(
            err.to_string(),
            "statement index 5 out of range for test case of length 3"
        );

        let err = StatementError::KindMismatch {
            index: 0,
            expected: ValueKind::Str,
            actual: ValueKind::Int,
        };
        assert_eq!(
            err.to_string(),
            "statement 0 holds a integer value, expected string"
        );
    }

    #[test]
    fn test_search_error_from_statement_error() {
        let stmt_err = StatementError::OutOfRange { index: 1, len: 0 };
        let err: SearchError = stmt_err.into();
        assert!(matches!(err, SearchError::Statement(_)));
    }
}
