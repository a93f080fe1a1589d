use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use time::OffsetDateTime;

/// Status posted on a commit by an external CI provider.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, SmartDefault)]
pub struct GhCommitStatusItem {
    pub state: GhCommitStatusState,
    pub context: String,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Commit status state.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, SmartDefault)]
#[serde(rename_all = "snake_case")]
pub enum GhCommitStatusState {
    /// Error.
    Error,
    /// Failure.
    Failure,
    /// Pending.
    #[default]
    Pending,
    /// Success.
    Success,
}

impl GhCommitStatusState {
    pub fn to_str(self) -> &'static str {
        self.into()
    }

    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }

    /// `error` counts as a failure.
    pub fn is_failing(self) -> bool {
        matches!(self, Self::Failure | Self::Error)
    }
}

impl From<GhCommitStatusState> for &'static str {
    fn from(status_state: GhCommitStatusState) -> Self {
        match status_state {
            GhCommitStatusState::Error => "error",
            GhCommitStatusState::Failure => "failure",
            GhCommitStatusState::Pending => "pending",
            GhCommitStatusState::Success => "success",
        }
    }
}
