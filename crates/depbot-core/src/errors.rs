//! Logic errors.

use thiserror::Error;

use crate::semver_range::VersionRangeError;

/// Logic error.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum DomainError {
    /// Wraps [`depbot_ghapi_interface::ApiError`].
    #[error("API error: {source}")]
    ApiError {
        source: depbot_ghapi_interface::ApiError,
    },

    /// Wraps [`depbot_database_interface::DatabaseError`].
    #[error("Database error: {source}")]
    DatabaseError {
        source: depbot_database_interface::DatabaseError,
    },

    #[error("Lock service error: {source}")]
    LockError {
        source: depbot_lock_interface::LockError,
    },

    #[error("Could not acquire lock '{name}' before timeout")]
    LockTimeout { name: String },

    #[error("Version error: {source}")]
    VersionRangeError { source: VersionRangeError },

    #[error("Repository path error: {source}")]
    RepositoryPathError {
        source: depbot_models::RepositoryPathError,
    },

    #[error("Invalid payload for job '{name}': {source}")]
    InvalidPayload {
        name: String,
        source: serde_json::Error,
    },

    #[error("Invalid manifest '{path}': {source}")]
    InvalidManifest {
        path: String,
        source: serde_json::Error,
    },

    #[error(
        "Pin branch '{branch_id}' of repository '{repository_id}' has no issue (issue number: {issue_number:?})"
    )]
    MissingIssueForPin {
        repository_id: u64,
        branch_id: u64,
        issue_number: Option<u64>,
    },
}

impl From<depbot_ghapi_interface::ApiError> for DomainError {
    fn from(e: depbot_ghapi_interface::ApiError) -> Self {
        Self::ApiError { source: e }
    }
}

impl From<depbot_database_interface::DatabaseError> for DomainError {
    fn from(e: depbot_database_interface::DatabaseError) -> Self {
        Self::DatabaseError { source: e }
    }
}

impl From<depbot_lock_interface::LockError> for DomainError {
    fn from(e: depbot_lock_interface::LockError) -> Self {
        Self::LockError { source: e }
    }
}

impl From<VersionRangeError> for DomainError {
    fn from(e: VersionRangeError) -> Self {
        Self::VersionRangeError { source: e }
    }
}

impl From<depbot_models::RepositoryPathError> for DomainError {
    fn from(e: depbot_models::RepositoryPathError) -> Self {
        Self::RepositoryPathError { source: e }
    }
}

/// Result alias for `DomainError`.
pub type Result<T> = core::result::Result<T, DomainError>;
