use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use time::OffsetDateTime;

use crate::{CombinedState, DependencyType};

/// What a branch proposes.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub enum BranchPurpose {
    /// Move a dependency forward.
    #[default]
    Update,
    /// Move a dependency back to its last known-good version.
    Pin,
}

/// Derived lifecycle of a branch.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum BranchLifecycle {
    AwaitingSignal,
    ProcessedSuccess,
    ProcessedFailure,
    ReferenceDeleted,
}

/// One in-flight update attempt.
#[derive(Debug, Clone, SmartDefault, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    pub id: u64,
    pub revision: u64,
    pub repository_id: u64,
    pub account_id: u64,
    pub installation_id: u64,
    /// Dependency name, or monorepo group name.
    pub dependency: String,
    pub dependency_type: DependencyType,
    /// Target version.
    pub version: String,
    /// Requirement before the update.
    pub old_version: Option<String>,
    /// Highest published version satisfying the old requirement.
    pub old_version_resolved: Option<String>,
    /// Manifest path touched by the branch.
    #[default("package.json".to_string())]
    pub path: String,
    pub base: String,
    pub head: String,
    pub purpose: BranchPurpose,
    pub group_name: Option<String>,
    pub monorepo_group: Option<String>,
    /// Originating issue of a pin branch.
    pub issue_number: Option<u64>,
    pub sha: String,
    pub processed: bool,
    pub state: Option<CombinedState>,
    pub reference_deleted: bool,
    pub initial: bool,
    pub subgroup_initial: bool,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Branch {
    /// Issue key: the group name for group branches, the dependency otherwise.
    pub fn issue_key(&self) -> &str {
        self.group_name.as_deref().unwrap_or(&self.dependency)
    }

    pub fn is_onboarding(&self) -> bool {
        self.initial || self.subgroup_initial
    }

    pub fn lifecycle(&self) -> BranchLifecycle {
        if self.reference_deleted {
            BranchLifecycle::ReferenceDeleted
        } else if !self.processed {
            BranchLifecycle::AwaitingSignal
        } else if self.state == Some(CombinedState::Success) {
            BranchLifecycle::ProcessedSuccess
        } else {
            BranchLifecycle::ProcessedFailure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle() {
        let mut branch = Branch::default();
        assert_eq!(branch.lifecycle(), BranchLifecycle::AwaitingSignal);

        branch.processed = true;
        branch.state = Some(CombinedState::Failure);
        assert_eq!(branch.lifecycle(), BranchLifecycle::ProcessedFailure);

        branch.state = Some(CombinedState::Success);
        assert_eq!(branch.lifecycle(), BranchLifecycle::ProcessedSuccess);

        branch.reference_deleted = true;
        assert_eq!(branch.lifecycle(), BranchLifecycle::ReferenceDeleted);
    }

    #[test]
    fn issue_key() {
        let mut branch = Branch {
            dependency: "lodash".into(),
            ..Default::default()
        };
        assert_eq!(branch.issue_key(), "lodash");

        branch.group_name = Some("frontend".into());
        assert_eq!(branch.issue_key(), "frontend");
    }
}
