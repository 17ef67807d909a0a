//! Error types for docbridge operations.

use std::fmt;

/// The primary error type for all docbridge operations.
#[derive(Debug)]
pub enum Error {
    /// Configuration errors (bad options, unresolved template placeholders).
    /// Raised at schema-compile or loader-attach time, never retried.
    Config(ConfigError),
    /// Relation errors (invalid assignment, missing parent context).
    /// Local to the call; the caller must fix the value and retry.
    Relation(RelationError),
    /// Store errors from the underlying document client, passed through
    /// unmodified.
    Store(StoreError),
    /// Serialization/deserialization errors
    Serde(String),
    /// Custom error with message
    Custom(String),
}

/// A configuration error surfaced to the developer before runtime.
#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
}

/// An invalid relation operation.
#[derive(Debug)]
pub struct RelationError {
    pub kind: RelationErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationErrorKind {
    /// Null assigned to a non-nullable relation slot
    NonNullable,
    /// Accessor used without a bound parent record
    Unbound,
    /// Parent record was dropped while the relation was still in use
    ParentDropped,
    /// More than one document matched a to-one reference during batch load
    DuplicateMatch,
}

/// A failure reported by the document store client.
#[derive(Debug)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// No document matched the given id
    NotFound,
    /// A document with the given id already exists
    Duplicate,
    /// I/O failure talking to the store
    Io,
    /// Any other backend failure
    Backend,
}

impl Error {
    /// Build a configuration error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(ConfigError {
            message: message.into(),
        })
    }

    /// Build a relation error from a kind and message.
    pub fn relation(kind: RelationErrorKind, message: impl Into<String>) -> Self {
        Error::Relation(RelationError {
            kind,
            message: message.into(),
        })
    }

    /// Build a store error from a kind and message.
    pub fn store(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Error::Store(StoreError {
            kind,
            message: message.into(),
            source: None,
        })
    }

    /// Check whether this is a store-level "not found" error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Store(StoreError {
                kind: StoreErrorKind::NotFound,
                ..
            })
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "configuration error: {}", e.message),
            Error::Relation(e) => write!(f, "relation error: {}", e.message),
            Error::Store(e) => write!(f, "store error: {}", e.message),
            Error::Serde(msg) => write!(f, "serde error: {msg}"),
            Error::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(e) => e
                .source
                .as_deref()
                .map(|s| s as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serde(e.to_string())
    }
}

/// Convenience result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_config() {
        let err = Error::config("missing option 'innerKey'");
        assert_eq!(
            err.to_string(),
            "configuration error: missing option 'innerKey'"
        );
    }

    #[test]
    fn test_display_relation() {
        let err = Error::relation(
            RelationErrorKind::NonNullable,
            "unable to set null value for non nullable relation",
        );
        assert!(err.to_string().contains("non nullable"));
    }

    #[test]
    fn test_is_not_found() {
        let err = Error::store(StoreErrorKind::NotFound, "no such document");
        assert!(err.is_not_found());

        let err = Error::store(StoreErrorKind::Duplicate, "duplicate id");
        assert!(!err.is_not_found());
        assert!(!Error::Custom("x".into()).is_not_found());
    }

    #[test]
    fn test_store_error_source() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err = Error::Store(StoreError {
            kind: StoreErrorKind::Io,
            message: "write failed".into(),
            source: Some(Box::new(io)),
        });
        assert!(std::error::Error::source(&err).is_some());
    }
}
