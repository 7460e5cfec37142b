use std::path::PathBuf;

use thiserror::Error;

/// Every way a release check can fail.
#[derive(Error, Debug)]
pub enum ReleaseCheckError {
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("root version mismatch: {documented} != {actual}")]
    RootVersionMismatch { documented: String, actual: String },

    #[error("changelog entry missing: {version} not found in {}", path.display())]
    ChangelogEntryMissing { version: String, path: PathBuf },

    #[error("tag exists: {0}")]
    TagExists(String),

    #[error("version {0} is already published to the package index")]
    AlreadyPublished(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("helper `{command}` failed: {reason}")]
    Helper { command: String, reason: String },

    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("package index request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReleaseCheckError>;

impl ReleaseCheckError {
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseCheckError::Config(msg.into())
    }

    pub fn invalid_version(version: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseCheckError::InvalidVersion {
            version: version.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_names_both_values() {
        let err = ReleaseCheckError::RootVersionMismatch {
            documented: "v6-28-00".to_string(),
            actual: "v6-30-02".to_string(),
        };
        assert_eq!(err.to_string(), "root version mismatch: v6-28-00 != v6-30-02");
    }

    #[test]
    fn test_read_file_mentions_path() {
        let err = ReleaseCheckError::ReadFile {
            path: PathBuf::from("doc/changelog.rst"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("doc/changelog.rst"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: ReleaseCheckError = io_err.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
