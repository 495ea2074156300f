//! Error types for fallible state operations.
//!
//! Plain reads and writes on a tab never fail. Only typed conversions and
//! disk persistence return [`Result`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors raised by typed accessors and persistence.
#[derive(Error, Debug)]
pub enum StateError {
    /// Reading, writing or renaming the state file failed.
    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding or decoding JSON failed, including a state file of the wrong shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored value does not deserialize into the requested type.
    #[error("value `{tab}.{key}` has an unexpected type: {source}")]
    Decode {
        tab: String,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A typed JSON read hit an in-memory value.
    #[error("value `{tab}.{key}` is an opaque `{type_name}`, not JSON")]
    NotJson {
        tab: String,
        key: String,
        type_name: &'static str,
    },
}

impl StateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = StateError::io(
            "/tmp/state.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/state.json"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn not_json_names_the_slot() {
        let err = StateError::NotJson {
            tab: "explorer".to_string(),
            key: "frame".to_string(),
            type_name: "Vec<u8>",
        };
        assert_eq!(
            err.to_string(),
            "value `explorer.frame` is an opaque `Vec<u8>`, not JSON"
        );
    }
}
