use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use time::OffsetDateTime;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    #[default]
    Open,
    Closed,
}

/// Onboarding pull request.
#[derive(Debug, Clone, SmartDefault, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    pub id: u64,
    pub revision: u64,
    pub repository_id: u64,
    pub number: u64,
    pub head: String,
    pub dependency: Option<String>,
    pub group_name: Option<String>,
    pub initial: bool,
    pub subgroup_initial: bool,
    pub merged: bool,
    pub state: PullRequestState,
    pub confirmation_commented: bool,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PullRequest {
    pub fn is_open(&self) -> bool {
        self.state == PullRequestState::Open
    }
}
