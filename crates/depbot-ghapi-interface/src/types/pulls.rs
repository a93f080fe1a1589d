use serde::{Deserialize, Serialize};

/// GitHub pull request, as listed.
#[derive(Debug, Deserialize, Serialize, Default, PartialEq, Eq, Clone)]
pub struct GhPullRequest {
    /// Number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Head branch name.
    pub head: String,
}
