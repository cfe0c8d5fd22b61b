//! Error types for document operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing, navigating, or writing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Malformed XML input.
    #[error("malformed XML: {message}")]
    Malformed { message: String },

    /// Element path syntax error.
    #[error("invalid element path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// No element at the given path.
    #[error("no element at {path}")]
    ElementNotFound { path: String },

    /// No such attribute on the element.
    #[error("no attribute '{name}' on {path}")]
    AttributeNotFound { path: String, name: String },

    /// No element carries the requested uID.
    #[error("no element with uID '{uid}'")]
    UidNotFound { uid: String },

    /// Text written to an element that has child elements.
    #[error("element {path} has children and cannot carry text")]
    TextOnBranch { path: String },

    /// Vector element exists but holds no values.
    #[error("empty vector at {path}")]
    EmptyVector { path: String },

    /// Unparseable numeric token.
    #[error("malformed number '{token}' at {path}")]
    MalformedNumber { path: String, token: String },

    /// Element text does not parse as the requested value kind.
    #[error("expected {expected} at {path}, found '{text}'")]
    ValueKind {
        path: String,
        expected: &'static str,
        text: String,
    },

    /// XML reader/writer error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

impl DocumentError {
    /// Create a Malformed error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an ElementNotFound error.
    pub fn element_not_found(path: impl Into<String>) -> Self {
        Self::ElementNotFound { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DocumentError::element_not_found("/cpacs/vehicles/aircraft");
        assert_eq!(format!("{err}"), "no element at /cpacs/vehicles/aircraft");

        let err = DocumentError::invalid_path("vehicles", "path must start with '/'");
        assert_eq!(
            format!("{err}"),
            "invalid element path 'vehicles': path must start with '/'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let doc_err: DocumentError = io_err.into();
        assert!(matches!(doc_err, DocumentError::Io(_)));
    }
}
