//! Error types for armm
//!
//! Defines the error enum covering every failure mode of the manifest core
//! and the CLI shell around it. Uses thiserror for ergonomic error handling.

use crate::manifest::ElementKind;
use std::fmt;
use thiserror::Error;

/// Result type alias for armm operations
pub type Result<T> = std::result::Result<T, ArmmError>;

/// Error type for armm operations
#[derive(Error, Debug)]
pub enum ArmmError {
    /// A destructive operation would overwrite existing state without force
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed manifest XML
    #[error("Parse error: {0}")]
    Parse(String),

    /// Required attribute rules were violated
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Element name not present in the registry
    #[error("Unknown element: {0}")]
    UnknownElement(String),

    /// Attribute filter could not be compiled
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Malformed arguments handed to the core
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

/// Broad failure classes reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Existing state would be overwritten
    Precondition,
    /// Backing store unreadable, unwritable or malformed
    Io,
    /// Required attribute missing on create or targeted by a removal
    Validation,
    /// Bad input from the caller (unknown element, bad filter, bad config)
    Usage,
}

impl ArmmError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            ArmmError::Precondition(_) => ErrorCategory::Precondition,
            ArmmError::Io(_) | ArmmError::Parse(_) => ErrorCategory::Io,
            ArmmError::Validation(_) => ErrorCategory::Validation,
            ArmmError::UnknownElement(_)
            | ArmmError::InvalidFilter(_)
            | ArmmError::InvalidArgument(_)
            | ArmmError::Config(_)
            | ArmmError::Yaml(_)
            | ArmmError::Json(_)
            | ArmmError::Other(_) => ErrorCategory::Usage,
        }
    }
}

/// Why a set of attributes was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    /// Creating the element would leave required attributes unset
    MissingRequired,
    /// Required attributes can never be removed
    RequiredNotRemovable,
}

/// Validation error details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ElementKind,
    pub reason: ValidationReason,
    pub attributes: Vec<String>,
}

impl ValidationError {
    pub(crate) fn missing(kind: ElementKind, attributes: Vec<String>) -> Self {
        Self {
            kind,
            reason: ValidationReason::MissingRequired,
            attributes,
        }
    }

    pub(crate) fn not_removable(kind: ElementKind, attributes: Vec<String>) -> Self {
        Self {
            kind,
            reason: ValidationReason::RequiredNotRemovable,
            attributes,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attrs = self.attributes.join(", ");
        match self.reason {
            ValidationReason::MissingRequired => write!(
                f,
                "[{}] the following required attributes not provided: {}",
                self.kind, attrs
            ),
            ValidationReason::RequiredNotRemovable => write!(
                f,
                "[{}] cannot remove the following required attributes: {}",
                self.kind, attrs
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
