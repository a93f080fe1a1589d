use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Revision conflict on {kind} '{id}': expected revision {expected}, found {found}")]
    RevisionConflict {
        kind: &'static str,
        id: u64,
        expected: u64,
        found: u64,
    },

    #[error("{kind} '{key}' already exists")]
    AlreadyExists { kind: &'static str, key: String },

    #[error("Transient database error: {message}")]
    Transient { message: String },

    #[error("Unknown repository ID '{0}'")]
    UnknownRepositoryId(u64),

    #[error("Unknown branch ID '{0}'")]
    UnknownBranchId(u64),

    #[error("Unknown issue ID '{0}'")]
    UnknownIssueId(u64),

    #[error("Unknown pull request ID '{0}'")]
    UnknownPullRequestId(u64),

    #[error("Unknown monorepo release ID '{0}'")]
    UnknownMonorepoReleaseId(u64),

    #[error("Unknown registry snapshot '{0}'")]
    UnknownRegistrySnapshot(String),

    #[error(transparent)]
    ImplementationError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl DatabaseError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Errors worth a new read-modify-write cycle.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transient { .. } | Self::RevisionConflict { .. } | Self::AlreadyExists { .. }
        )
    }
}

pub type Result<T, E = DatabaseError> = core::result::Result<T, E>;
