use serde::{Deserialize, Serialize};

/// GitHub issue state.
#[derive(Debug, Deserialize, Serialize, Default, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum GhIssueState {
    /// Open.
    #[default]
    Open,
    /// Closed.
    Closed,
}

/// GitHub issue.
#[derive(Debug, Deserialize, Serialize, Default, PartialEq, Eq, Clone)]
pub struct GhIssue {
    /// Number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// State.
    pub state: GhIssueState,
}
