//! Error types for document loading and strict resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or resolving a document.
///
/// Plain resolution never fails; these come from loading the document or
/// from strict mode.
#[derive(Debug, Error)]
pub enum ResolveError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    // Strict mode (exit code 2)
    #[error("dangling reference at {path}: {reference} names no definition")]
    DanglingReference { path: String, reference: String },
}

impl ResolveError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ResolveError::FileNotFound { .. } | ResolveError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            ResolveError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_error_exit_codes() {
        let err = ResolveError::FileNotFound {
            path: PathBuf::from("openapi.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = ResolveError::ReadError {
            path: PathBuf::from("openapi.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = ResolveError::DanglingReference {
            path: "/paths/~1pets/get".into(),
            reference: "#/components/schemas/Missing".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_json_exit_code() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ResolveError::InvalidJson { source };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn dangling_reference_display() {
        let err = ResolveError::DanglingReference {
            path: "/paths/~1pets/get/schema".into(),
            reference: "#/components/schemas/Ghost".into(),
        };
        assert_eq!(
            err.to_string(),
            "dangling reference at /paths/~1pets/get/schema: #/components/schemas/Ghost names no definition"
        );
    }
}
