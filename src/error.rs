//! Error types for scormkit operations.

use thiserror::Error;

/// Errors that can occur while building, exporting or inspecting a package.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Unsupported SCORM version: {0}")]
    UnsupportedVersion(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// HTTP status code the export endpoint reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Input(_) | Error::UnsupportedVersion(_) => 400,
            Error::NotFound(_) => 404,
            _ => 500,
        }
    }

    /// Whether the failure was caused by the caller's request.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Input("formationId".into()).status_code(), 400);
        assert_eq!(Error::UnsupportedVersion("SCORM_3".into()).status_code(), 400);
        assert_eq!(Error::NotFound("f1".into()).status_code(), 404);
        assert_eq!(Error::Generation("too deep".into()).status_code(), 500);
        assert_eq!(Error::Storage("upload".into()).status_code(), 500);
    }

    #[test]
    fn test_client_error() {
        assert!(Error::NotFound("f1".into()).is_client_error());
        assert!(!Error::Storage("bucket".into()).is_client_error());
    }
}
