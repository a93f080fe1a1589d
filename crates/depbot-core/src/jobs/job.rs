use std::{collections::BTreeMap, fmt::Display};

use depbot_models::{CombinedState, DependencyType};
use serde::{Deserialize, Serialize};

/// Why a branch is retired.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone)]
#[serde(rename_all = "kebab-case")]
pub enum RetirementReason {
    DependencyRemoved,
    SatisfiedByNewRange,
    BelowNewRange,
    AboveNewRange,
    GroupRemoved,
    GroupModified,
    UpdateSucceeded,
}

impl RetirementReason {
    pub fn to_str(self) -> &'static str {
        match self {
            Self::DependencyRemoved => "dependency-removed",
            Self::SatisfiedByNewRange => "satisfied-by-new-range",
            Self::BelowNewRange => "below-new-range",
            Self::AboveNewRange => "above-new-range",
            Self::GroupRemoved => "group-removed",
            Self::GroupModified => "group-modified",
            Self::UpdateSucceeded => "update-succeeded",
        }
    }
}

impl Display for RetirementReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Update of one repository, or one group of a repository.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct VersionBranchJob {
    pub repository_id: u64,
    pub installation_id: u64,
    /// Dependency name, or monorepo group name.
    pub dependency: String,
    /// Released packages.
    pub dependency_names: Vec<String>,
    pub dependency_type: DependencyType,
    pub priority: u8,
    pub version: String,
    pub versions: BTreeMap<String, serde_json::Value>,
    pub old_version: Option<String>,
    pub old_version_resolved: Option<String>,
    pub group_name: Option<String>,
    pub monorepo_group: Option<String>,
    /// Manifest paths to update.
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MonorepoReleaseTimeoutJob {
    pub group: String,
    pub version: String,
    /// Package which opened the release.
    pub dependency: String,
    pub dist_tags: BTreeMap<String, String>,
    pub versions: BTreeMap<String, serde_json::Value>,
    pub run_after_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DeleteBranchJob {
    pub repository_id: u64,
    pub installation_id: u64,
    pub branch_id: u64,
    pub reason: RetirementReason,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct InitialPrJob {
    pub repository_id: u64,
    pub installation_id: u64,
    pub branch_id: u64,
    pub head: String,
    pub group_name: Option<String>,
    pub state: CombinedState,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CommentOnInitialPrJob {
    pub repository_id: u64,
    pub installation_id: u64,
    pub pull_request_number: u64,
    pub branch_id: u64,
    pub state: CombinedState,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct InvalidGroupConfigJob {
    pub repository_id: u64,
    pub installation_id: u64,
    pub message: String,
}

/// Job scheduled by the external work queue.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "name", content = "payload", rename_all = "kebab-case")]
pub enum Job {
    CreateVersionBranch(VersionBranchJob),
    CreateGroupVersionBranch(VersionBranchJob),
    MonorepoReleaseTimeout(MonorepoReleaseTimeoutJob),
    DeleteBranch(DeleteBranchJob),
    CreateInitialPr(InitialPrJob),
    CreateInitialSubgroupPr(InitialPrJob),
    CommentOnInitialPr(CommentOnInitialPrJob),
    InvalidGroupConfig(InvalidGroupConfigJob),
}

impl Job {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateVersionBranch(_) => "create-version-branch",
            Self::CreateGroupVersionBranch(_) => "create-group-version-branch",
            Self::MonorepoReleaseTimeout(_) => "monorepo-release-timeout",
            Self::DeleteBranch(_) => "delete-branch",
            Self::CreateInitialPr(_) => "create-initial-pr",
            Self::CreateInitialSubgroupPr(_) => "create-initial-subgroup-pr",
            Self::CommentOnInitialPr(_) => "comment-on-initial-pr",
            Self::InvalidGroupConfig(_) => "invalid-group-config",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn serialized_shape() {
        let job = Job::DeleteBranch(DeleteBranchJob {
            repository_id: 1,
            installation_id: 2,
            branch_id: 3,
            reason: RetirementReason::SatisfiedByNewRange,
        });

        assert_eq!(
            serde_json::to_value(&job).unwrap(),
            json!({
                "name": "delete-branch",
                "payload": {
                    "repository_id": 1,
                    "installation_id": 2,
                    "branch_id": 3,
                    "reason": "satisfied-by-new-range"
                }
            })
        );
    }

    #[test]
    fn names_match_tags() {
        let jobs = [
            Job::CreateGroupVersionBranch(VersionBranchJob::default()),
            Job::MonorepoReleaseTimeout(MonorepoReleaseTimeoutJob::default()),
            Job::CreateInitialSubgroupPr(InitialPrJob::default()),
            Job::CommentOnInitialPr(CommentOnInitialPrJob::default()),
            Job::InvalidGroupConfig(InvalidGroupConfigJob::default()),
        ];

        for job in jobs {
            let value = serde_json::to_value(&job).unwrap();
            assert_eq!(value["name"], job.name());
        }
    }
}
