//! Document loading from files, strings, and HTTP URLs.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::ResolveError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load an OpenAPI document from a file path.
///
/// # Errors
///
/// Returns `ResolveError::FileNotFound` if the file doesn't exist,
/// or `ResolveError::InvalidJson` if the file isn't valid JSON.
pub fn load_document(path: &Path) -> Result<Value, ResolveError> {
    if !path.exists() {
        return Err(ResolveError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "loading document");
    let content = std::fs::read_to_string(path).map_err(|source| ResolveError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_document_str(&content)
}

/// Load an OpenAPI document from a JSON string.
///
/// # Errors
///
/// Returns `ResolveError::InvalidJson` if the string isn't valid JSON.
pub fn load_document_str(content: &str) -> Result<Value, ResolveError> {
    serde_json::from_str(content).map_err(|source| ResolveError::InvalidJson { source })
}

/// Load an OpenAPI document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `ResolveError::NetworkError` if the request fails, the server
/// answers with an error status, or the body isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_document_url(url: &str) -> Result<Value, ResolveError> {
    let network_error = |source| ResolveError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    debug!(url, "fetching document");
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .map_err(network_error)?
        .error_for_status()
        .map_err(network_error)?;

    response.json().map_err(network_error)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a document from a file path or URL.
///
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_document_auto(source: &str) -> Result<Value, ResolveError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_document_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(ResolveError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_document(Path::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_document_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"openapi": "3.0.0", "paths": {{}}}}"#).unwrap();

        let document = load_document(file.path()).unwrap();
        assert_eq!(document["openapi"], "3.0.0");
    }

    #[test]
    fn load_document_file_not_found() {
        let result = load_document(Path::new("/nonexistent/openapi.json"));
        assert!(matches!(result, Err(ResolveError::FileNotFound { .. })));
    }

    #[test]
    fn load_document_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let result = load_document(file.path());
        assert!(matches!(result, Err(ResolveError::InvalidJson { .. })));
    }

    #[test]
    fn load_document_str_valid() {
        let document = load_document_str(r#"{"paths": {}}"#).unwrap();
        assert!(document["paths"].is_object());
    }

    #[test]
    fn load_document_str_invalid() {
        let result = load_document_str("not json");
        assert!(matches!(result, Err(ResolveError::InvalidJson { .. })));
    }

    #[test]
    fn is_url_schemes() {
        assert!(is_url("https://example.com/openapi.json"));
        assert!(is_url("http://example.com/openapi.json"));
        assert!(!is_url("/path/to/openapi.json"));
        assert!(!is_url("./openapi.json"));
        assert!(!is_url("openapi.json"));
    }

    #[test]
    fn load_document_auto_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"paths": {{"/a": {{}}}}}}"#).unwrap();

        let document = load_document_auto(file.path().to_str().unwrap()).unwrap();
        assert!(document["paths"].get("/a").is_some());
    }

    #[cfg(feature = "remote")]
    mod remote {
        use super::*;

        #[test]
        fn load_document_url_valid() {
            let mut server = mockito::Server::new();
            let mock = server
                .mock("GET", "/openapi.json")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(r#"{"openapi": "3.1.0", "paths": {}}"#)
                .create();

            let url = format!("{}/openapi.json", server.url());
            let document = load_document_url(&url).unwrap();

            mock.assert();
            assert_eq!(document["openapi"], "3.1.0");
        }

        #[test]
        fn load_document_url_404() {
            let mut server = mockito::Server::new();
            let _mock = server.mock("GET", "/missing.json").with_status(404).create();

            let url = format!("{}/missing.json", server.url());
            let result = load_document_url(&url);
            assert!(matches!(result, Err(ResolveError::NetworkError { .. })));
        }

        #[test]
        fn load_document_url_invalid_body() {
            let mut server = mockito::Server::new();
            let _mock = server
                .mock("GET", "/broken.json")
                .with_status(200)
                .with_body("{ not json")
                .create();

            let url = format!("{}/broken.json", server.url());
            let result = load_document_url(&url);
            assert!(matches!(result, Err(ResolveError::NetworkError { .. })));
        }

        #[test]
        fn load_document_auto_url() {
            let mut server = mockito::Server::new();
            let _mock = server
                .mock("GET", "/openapi.json")
                .with_status(200)
                .with_body(r#"{"paths": {}}"#)
                .create();

            let result = load_document_auto(&format!("{}/openapi.json", server.url()));
            assert!(result.is_ok());
        }
    }
}
