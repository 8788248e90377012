//! Error types for tfbreak.
//!
//! This module defines the error hierarchy using `thiserror`. All errors
//! carry the source location where they were raised and can be propagated
//! with the `?` operator.
//!
//! # Error Categories
//!
//! - **Parse errors**: malformed HCL or JSON in either module snapshot
//! - **Structure errors**: well-formed files that are not a valid module
//!   (missing labels, duplicate names, outputs without a value)
//! - **IO errors**: reading module directories
//! - **Config errors**: invalid configuration files
//! - **Internal errors**: broken invariants between pipeline stages
//!
//! # Example
//!
//! ```rust
//! use tfbreak::error::{TfBreakError, Result};
//!
//! fn read_module_file(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .map_err(|e| TfBreakError::io(path, e, file!(), line!()))
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Usage:
/// ```ignore
/// return Err(err!(Internal { message: "stage mismatch".to_string() }));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident: $value:expr),* $(,)? }) => {
        $crate::error::TfBreakError::$variant {
            $($field: $value,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for tfbreak operations.
pub type Result<T> = std::result::Result<T, TfBreakError>;

/// The main error type for tfbreak.
#[derive(Error, Debug)]
pub enum TfBreakError {
    // =========================================================================
    // I/O and File System Errors
    // =========================================================================
    /// I/O error with path context.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Module directory not found.
    #[error("Directory not found: {path} ({src_path}:{src_line})")]
    DirectoryNotFound {
        /// The missing directory path
        path: PathBuf,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Language Errors
    // =========================================================================
    /// Syntax error in a `.tf` or `.tf.json` file.
    #[error("Failed to parse '{file}' \n\t({src_path}:{src_line}): {message}")]
    HclParse {
        /// The file being parsed
        file: PathBuf,
        /// Parser message
        message: String,
        /// Line number (if available)
        line: Option<usize>,
        /// Column number (if available)
        column: Option<usize>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Syntactically valid file that does not describe a valid module.
    #[error("Invalid module structure in '{file}' ({src_path}:{src_line}): {message}")]
    HclStructure {
        /// The offending file
        file: PathBuf,
        /// Description of the structural issue
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Report Errors
    // =========================================================================
    /// Report generation error.
    #[error("Failed to generate report ({src_path}:{src_line}): {message}")]
    ReportGeneration {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Generic Errors
    // =========================================================================
    /// Internal error: an invariant between pipeline stages was broken.
    #[error("Internal error ({src_path}:{src_line}): {message}")]
    Internal {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },
}

impl TfBreakError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
            src_path,
            src_line,
        }
    }

    /// Creates an `HclParse` error.
    #[must_use]
    pub fn hcl_parse(
        file: PathBuf,
        message: String,
        line: Option<usize>,
        column: Option<usize>,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::HclParse {
            file,
            message,
            line,
            column,
            src_path,
            src_line,
        }
    }

    /// Creates an `HclStructure` error.
    #[must_use]
    pub fn hcl_structure(
        file: PathBuf,
        message: String,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::HclStructure {
            file,
            message,
            src_path,
            src_line,
        }
    }

    /// Creates a `ConfigParse` error.
    #[must_use]
    pub fn config_parse(
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::ConfigParse {
            message,
            source,
            src_path,
            src_line,
        }
    }

    /// Creates an `Internal` error.
    #[must_use]
    pub fn internal(message: String, src_path: &'static str, src_line: u32) -> Self {
        Self::Internal {
            message,
            src_path,
            src_line,
        }
    }

    /// Returns true if the error came from the user's module sources rather
    /// than from tfbreak itself.
    #[must_use]
    pub const fn is_source_error(&self) -> bool {
        matches!(self, Self::HclParse { .. } | Self::HclStructure { .. })
    }

    /// Returns the appropriate exit code for the error.
    ///
    /// Exit code 2 is reserved for "breaking changes found".
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => 13,
            Self::DirectoryNotFound { .. } => 15,
            Self::HclParse { .. } => 16,
            Self::HclStructure { .. } => 17,
            Self::ConfigParse { .. } => 18,
            _ => 1,
        }
    }
}

/// Extension trait for `Result` to add context to errors.
pub trait ResultExt<T> {
    /// Adds a file path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;

    /// Converts a general error into a `ConfigParse` error with context.
    fn to_config_parse_error(self, message: String) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| TfBreakError::Io {
            path: path.into(),
            source: *e
                .into()
                .downcast::<std::io::Error>()
                .unwrap_or_else(|e| Box::new(std::io::Error::other(e))),
            src_path: file!(),
            src_line: line!(),
        })
    }

    fn to_config_parse_error(self, message: String) -> Result<T> {
        self.map_err(|e| TfBreakError::config_parse(message, Some(e.into()), file!(), line!()))
    }
}

impl From<std::io::Error> for TfBreakError {
    fn from(source: std::io::Error) -> Self {
        // Prefer TfBreakError::io(path, ...) where the path is known
        Self::Io {
            path: PathBuf::new(),
            source,
            src_path: file!(),
            src_line: line!(),
        }
    }
}

impl From<serde_json::Error> for TfBreakError {
    fn from(source: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization/deserialization error: {source}"),
            src_path: file!(),
            src_line: line!(),
        }
    }
}
