//! Error types for skeleton preference parsing and provisioning
//!
//! This module defines the error types used throughout the skelprefs library.
//! All public functions return [`Result<T, Error>`] for consistent error handling.

use std::path::PathBuf;

/// Errors that can occur while reading, writing or provisioning preference files
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Lexer error during tokenization
    #[error("Lexer error at line {line}, column {column}: {message}")]
    Lexer {
        line: usize,
        column: usize,
        message: String,
    },

    /// Parser error during parsing
    #[error("Parser error at line {line}, column {column}: {message}")]
    Parser {
        line: usize,
        column: usize,
        message: String,
    },

    /// The same key appears twice in one file
    #[error("Duplicate preference key '{0}'")]
    DuplicateKey(String),

    /// Invalid preference key or value
    #[error("Invalid preference: {0}")]
    InvalidPreference(String),

    /// Source bytes are not valid UTF-8
    #[error("Preference file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Refusing to replace an existing file
    #[error("Refusing to overwrite existing file: {0}")]
    AlreadyExists(PathBuf),

    /// The written file does not match the source bytes
    #[error("Copy verification failed for {path}: expected {expected} bytes, found {found}")]
    CopyMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    /// Invalid glob pattern in query
    #[error("Invalid glob pattern: {0}")]
    InvalidGlobPattern(String),

    /// profiles.ini could not be read or written
    #[error("profiles.ini error: {0}")]
    ProfilesIni(String),

    /// Skeleton directory is missing or not a directory
    #[error("Invalid skeleton directory: {0}")]
    InvalidSkeletonDirectory(PathBuf),
}

/// Result type alias for convenience
///
/// All public functions in the skelprefs library return this type alias.
///
/// # Example
///
/// ```rust
/// use skelprefs::{Result, parse_prefs_js};
///
/// fn count_prefs(content: &str) -> Result<usize> {
///     let file = parse_prefs_js(content)?;
///     Ok(file.len())
/// }
/// # assert_eq!(count_prefs(r#"user_pref("a.b", 1);"#).unwrap(), 1);
/// ```
pub type Result<T> = std::result::Result<T, Error>;
