//! Error handling for the study service

use thiserror::Error;
use trainer_core::CoreError;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Study service error types
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported backup version: {0}")]
    UnsupportedBackupVersion(String),

    #[error("Backup checksum mismatch")]
    ChecksumMismatch,
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_question_not_found() {
        let error = ServiceError::QuestionNotFound("007".to_string());
        assert_eq!(error.to_string(), "Question not found: 007");
    }

    #[test]
    fn test_error_display_bad_request() {
        let error = ServiceError::BadRequest("empty user id".to_string());
        assert_eq!(error.to_string(), "Bad request: empty user id");
    }

    #[test]
    fn test_error_display_core() {
        let error = ServiceError::from(CoreError::InvalidArgument(
            "question id must not be empty".into(),
        ));
        assert_eq!(
            error.to_string(),
            "Core error: invalid argument: question id must not be empty"
        );
    }

    #[test]
    fn test_error_display_backup_version() {
        let error = ServiceError::UnsupportedBackupVersion("2.0".to_string());
        assert_eq!(error.to_string(), "Unsupported backup version: 2.0");
    }

    #[test]
    fn test_error_from_store() {
        let error = ServiceError::from(StoreError::Unavailable("lock poisoned".to_string()));
        assert!(matches!(error, ServiceError::Store(_)));
    }
}
