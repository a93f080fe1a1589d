use async_trait::async_trait;

use crate::{
    types::{GhCheckRunList, GhCommitStatusItem, GhFileContent, GhIssue, GhPullRequest},
    Result,
};

/// Hosting platform interface.
///
/// Every call is keyed by (installation, owner, name).
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ApiService: Send + Sync {
    /// List commit statuses for a reference.
    async fn commit_statuses_list(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        git_ref: &str,
    ) -> Result<Vec<GhCommitStatusItem>>;
    /// List check runs for a reference.
    async fn check_runs_list(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        git_ref: &str,
    ) -> Result<GhCheckRunList>;
    /// Get the head commit of a branch.
    async fn git_refs_get_sha(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<String>;
    /// Create a branch reference.
    async fn git_refs_create(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        branch: &str,
        sha: &str,
    ) -> Result<()>;
    /// Delete a branch reference.
    async fn git_refs_delete(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<()>;
    /// Read a file at a reference.
    async fn contents_get(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<GhFileContent>;
    /// Commit a new version of a file, returning the commit SHA.
    async fn contents_update(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        branch: &str,
        file: &GhFileContent,
        message: &str,
    ) -> Result<String>;
    /// Open an issue.
    async fn issues_create(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<GhIssue>;
    /// List open issues carrying a label.
    async fn issues_list_open(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        label: &str,
    ) -> Result<Vec<GhIssue>>;
    /// Post a comment on an issue or pull request.
    async fn comments_post(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<u64>;
    /// List open pull requests by head branch.
    async fn pulls_list(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        head: &str,
    ) -> Result<Vec<GhPullRequest>>;
}
