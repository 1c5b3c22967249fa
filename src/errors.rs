/*!
 * Error types for the rpytl application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when decoding a script or addressed text file
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The file is not valid UTF-8, even after stripping a byte-order mark
    #[error("File is not valid UTF-8: {path} (invalid byte at offset {offset})")]
    InvalidEncoding {
        /// Path of the offending file
        path: String,
        /// Byte offset where decoding failed
        offset: usize,
    },
}

/// Errors that can occur when loading or saving a placeholder mapping
#[derive(Error, Debug)]
pub enum MappingError {
    /// The mapping file could not be parsed
    #[error("Failed to parse mapping: {0}")]
    Parse(#[from] serde_json::Error),

    /// A key in the mapping file does not follow the @@N@@ form
    #[error("Invalid placeholder key in mapping: {0}")]
    InvalidKey(String),
}
