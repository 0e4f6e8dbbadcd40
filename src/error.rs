//! Error types for the grid model builder.
//!
//! This module provides a unified error type [`GridError`] that covers
//! all error conditions that can occur while reading a grid description,
//! validating construction inputs, and writing results.

use thiserror::Error;

/// Result type alias using [`GridError`].
pub type Result<T> = std::result::Result<T, GridError>;

/// Unified error type for all grid model operations.
#[derive(Error, Debug)]
pub enum GridError {
    // ============ Description Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// A required directive was never given
    #[error("Missing required directive '{directive}'")]
    MissingDirective { directive: &'static str },

    /// Two cables share a name
    #[error("Duplicate cable name '{name}' at line {line}")]
    DuplicateCable { name: String, line: usize },

    /// Cable endpoint does not name a node of the grid
    #[error("Unknown node '{node}' at line {line}")]
    UnknownNode { node: String, line: usize },

    /// Cable connects a node to itself
    #[error("Cable '{name}' at line {line} connects node {node} to itself")]
    SelfConnection {
        name: String,
        node: usize,
        line: usize,
    },

    // ============ Configuration Errors ============
    /// Connection matrix rows differ in length
    #[error("Connection matrix is not a square array: row {row} has {found} entries, expected {expected}")]
    InvalidConnectionMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Connection matrix entry too large to be a connection id
    #[error("Connection matrix entry {value} at ({row}, {col}) is not a valid connection id")]
    ConnectionIdOutOfRange { row: usize, col: usize, value: i64 },

    /// Connection matrix side does not match the element count
    #[error("Expected connection matrix of side {expected} (sources + loads), got {rows}x{cols}")]
    ConnectionMatrixShape {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    /// Required electrical parameter is absent
    #[error("Missing required parameter '{name}'")]
    MissingParameter { name: &'static str },

    /// Electrical parameter is not a positive finite number
    #[error("Parameter '{name}' must be a positive finite number (got {value})")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Connection probability outside [0, 1]
    #[error("Probability '{name}' must lie in [0, 1] (got {value})")]
    InvalidProbability { name: &'static str, value: f64 },

    // ============ I/O Errors ============
    /// Error reading an input file
    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed parameter JSON
    #[error("Invalid parameter data: {source}")]
    ParameterFormat {
        #[source]
        source: serde_json::Error,
    },

    /// Error writing results
    #[error("Output error: {message}")]
    OutputError { message: String },
}

impl GridError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::OutputError {
            message: message.into(),
        }
    }

    /// Whether this error rejects the inputs of model construction.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConnectionMatrix { .. }
                | Self::ConnectionIdOutOfRange { .. }
                | Self::ConnectionMatrixShape { .. }
                | Self::MissingParameter { .. }
                | Self::InvalidParameter { .. }
                | Self::InvalidProbability { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_classification() {
        assert!(GridError::MissingParameter { name: "R_load" }.is_configuration_error());
        assert!(GridError::ConnectionMatrixShape {
            expected: 3,
            rows: 2,
            cols: 2
        }
        .is_configuration_error());
        assert!(!GridError::parse(4, "bad").is_configuration_error());
    }

    #[test]
    fn test_error_messages_name_the_input() {
        let err = GridError::MissingParameter { name: "L_cabel" };
        assert_eq!(err.to_string(), "Missing required parameter 'L_cabel'");

        let err = GridError::ConnectionMatrixShape {
            expected: 3,
            rows: 4,
            cols: 4,
        };
        assert!(err.to_string().contains("side 3"));
    }
}
