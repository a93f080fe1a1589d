use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use time::OffsetDateTime;

use crate::DependencyType;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

/// Conversation about a failing update.
#[derive(Debug, Clone, SmartDefault, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    pub id: u64,
    pub revision: u64,
    pub repository_id: u64,
    pub number: u64,
    /// Dependency or group name.
    pub key: String,
    pub dependency_type: DependencyType,
    /// Failing version at opening time.
    pub version: String,
    /// Later versions observed failing, in order.
    pub comments: Vec<String>,
    pub state: IssueState,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Issue {
    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }

    /// Version already recorded as failing on this issue.
    pub fn has_seen_version(&self, version: &str) -> bool {
        self.version == version || self.comments.iter().any(|v| v == version)
    }
}
