use serde::{Deserialize, Serialize};

/// GitHub Check conclusion.
#[derive(Debug, Deserialize, Serialize, Default, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum GhCheckConclusion {
    /// Action required.
    ActionRequired,
    /// Cancelled.
    Cancelled,
    /// Failure.
    Failure,
    /// Neutral.
    Neutral,
    /// Skipped.
    Skipped,
    /// Stale.
    Stale,
    /// Startup failure.
    StartupFailure,
    /// Success.
    #[default]
    Success,
    /// Timed out.
    TimedOut,
}

impl GhCheckConclusion {
    /// Conclusions which fail a commit.
    pub fn is_failing(self) -> bool {
        matches!(
            self,
            Self::ActionRequired
                | Self::Cancelled
                | Self::Failure
                | Self::StartupFailure
                | Self::TimedOut
        )
    }

    /// Convert conclusion to static str.
    pub fn to_str(self) -> &'static str {
        match self {
            Self::ActionRequired => "action_required",
            Self::Cancelled => "cancelled",
            Self::Failure => "failure",
            Self::Neutral => "neutral",
            Self::Skipped => "skipped",
            Self::Stale => "stale",
            Self::StartupFailure => "startup_failure",
            Self::Success => "success",
            Self::TimedOut => "timed_out",
        }
    }
}
