//! Documents and value types.

#![warn(clippy::all)]

mod branch;
mod combined_state;
mod dependency_type;
mod dependency_usage;
mod group_config;
mod issue;
mod manifest;
mod monorepo_definitions;
mod monorepo_release;
mod pull_request;
mod registry_snapshot;
mod repository;
mod repository_path;

pub use branch::{Branch, BranchLifecycle, BranchPurpose};
pub use combined_state::{CombinedState, CombinedStateError};
pub use dependency_type::{DependencyType, DependencyTypeError};
pub use dependency_usage::DependencyUsage;
pub use group_config::{GroupConfig, GroupConfigs};
pub use issue::{Issue, IssueState};
pub use manifest::{Manifest, Manifests};
pub use monorepo_definitions::MonorepoDefinitions;
pub use monorepo_release::MonorepoRelease;
pub use pull_request::{PullRequest, PullRequestState};
pub use registry_snapshot::RegistrySnapshot;
pub use repository::Repository;
pub use repository_path::{RepositoryPath, RepositoryPathError};

/// Dist-tag which triggers update jobs.
pub const LATEST_TAG: &str = "latest";
