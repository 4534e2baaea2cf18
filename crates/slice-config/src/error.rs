//! Profile persistence error types.
//!
//! Every failure carries the path it happened on so the diagnostic log
//! can say where things went wrong, plus a user-facing message and an
//! optional remediation hint.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Profile persistence error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File or directory I/O error.
    #[error("Failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML.
    #[error("Malformed build config document: {path}")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    /// The document's `FileVersion` is not the one this crate understands.
    #[error("Build config version {found} is not supported (expected {expected})")]
    UnsupportedVersion {
        found: u32,
        expected: u32,
        path: PathBuf,
    },

    /// A required element is absent (document ended early).
    #[error("Missing element <{element}> in {path}")]
    MissingElement { element: &'static str, path: PathBuf },

    /// An element appeared where a different one was required.
    #[error("Expected element <{expected}> but found <{found}> in {path}")]
    UnexpectedElement {
        expected: &'static str,
        found: String,
        path: PathBuf,
    },

    /// An element's text could not be parsed into its field type.
    #[error("Invalid value {value:?} for <{element}> in {path}")]
    InvalidValue {
        element: &'static str,
        value: String,
        reason: String,
        path: PathBuf,
    },

    /// The temp file was written but could not replace the target.
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fragment I/O was requested before the config was loaded or saved.
    #[error("Build config is not bound to a file")]
    Unbound,
}

impl ConfigError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// File or directory the error refers to, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. }
            | Self::Xml { path, .. }
            | Self::UnsupportedVersion { path, .. }
            | Self::MissingElement { path, .. }
            | Self::UnexpectedElement { path, .. }
            | Self::InvalidValue { path, .. } => Some(path.as_path()),
            Self::AtomicWriteFailed { target_path, .. } => Some(target_path.as_path()),
            Self::Unbound => None,
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} {}", operation, path.display())
            }
            Self::Xml { path, source } => {
                format!(
                    "The file at {} is not a valid build config document: {}",
                    path.display(),
                    source
                )
            }
            Self::UnsupportedVersion {
                found, expected, ..
            } => {
                format!(
                    "This build config was written with file version {}, \
                    but only version {} can be read.",
                    found, expected
                )
            }
            Self::MissingElement { element, path } => {
                format!(
                    "The build config at {} ends before the <{}> setting.",
                    path.display(),
                    element
                )
            }
            Self::UnexpectedElement {
                expected, found, ..
            } => {
                format!("Found the <{found}> setting where <{expected}> was expected.")
            }
            Self::InvalidValue {
                element,
                value,
                reason,
                ..
            } => {
                format!("The value '{value}' for <{element}> could not be read: {reason}")
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::Unbound => {
                "The build config has not been loaded from or saved to a file yet.".to_string()
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::Xml { .. } | Self::MissingElement { .. } | Self::UnexpectedElement { .. } => {
                Some("Recreate the profile or restore it from a backup.".into())
            }
            Self::UnsupportedVersion { .. } => {
                Some("Re-save the profile with a matching version of the slicer.".into())
            }
            Self::InvalidValue { .. } => Some("Correct the value by hand and load again.".into()),
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
            Self::Unbound => Some("Load or save the profile before touching its fragments.".into()),
        }
    }
}

/// Result type alias for profile persistence operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_message_names_both_versions() {
        let err = ConfigError::UnsupportedVersion {
            found: 2,
            expected: 1,
            path: PathBuf::from("a.slicing"),
        };
        let message = err.user_message();
        assert!(message.contains('2'));
        assert!(message.contains('1'));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn io_suggestion_depends_on_operation() {
        let read = ConfigError::io("read", "x", std::io::Error::other("boom"));
        let write = ConfigError::io("write", "x", std::io::Error::other("boom"));
        assert_ne!(read.suggestion(), write.suggestion());
    }
}
