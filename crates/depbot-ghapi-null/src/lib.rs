//! Null driver for GH API.

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use depbot_ghapi_interface::{
    types::{GhCheckRunList, GhCommitStatusItem, GhFileContent, GhIssue, GhPullRequest},
    ApiService, Result,
};

/// Null API service.
#[derive(Clone, Default)]
pub struct NullApiService {
    _private: (),
}

impl NullApiService {
    /// Build a null API service.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

#[async_trait]
impl ApiService for NullApiService {
    #[tracing::instrument(skip(self), ret)]
    async fn commit_statuses_list(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        git_ref: &str,
    ) -> Result<Vec<GhCommitStatusItem>> {
        Ok(vec![])
    }

    #[tracing::instrument(skip(self), ret)]
    async fn check_runs_list(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        git_ref: &str,
    ) -> Result<GhCheckRunList> {
        Ok(GhCheckRunList::default())
    }

    #[tracing::instrument(skip(self), ret)]
    async fn git_refs_get_sha(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<String> {
        Ok(String::new())
    }

    #[tracing::instrument(skip(self))]
    async fn git_refs_create(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        branch: &str,
        sha: &str,
    ) -> Result<()> {
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn git_refs_delete(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<()> {
        Ok(())
    }

    #[tracing::instrument(skip(self), ret)]
    async fn contents_get(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<GhFileContent> {
        Ok(GhFileContent {
            path: path.into(),
            sha: String::new(),
            content: "{}".into(),
        })
    }

    #[tracing::instrument(skip(self, file), ret)]
    async fn contents_update(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        branch: &str,
        file: &GhFileContent,
        message: &str,
    ) -> Result<String> {
        Ok(String::new())
    }

    #[tracing::instrument(skip(self, body), ret)]
    async fn issues_create(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<GhIssue> {
        Ok(GhIssue {
            title: title.into(),
            ..Default::default()
        })
    }

    #[tracing::instrument(skip(self), ret)]
    async fn issues_list_open(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        label: &str,
    ) -> Result<Vec<GhIssue>> {
        Ok(vec![])
    }

    #[tracing::instrument(skip(self, body), ret)]
    async fn comments_post(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<u64> {
        Ok(0)
    }

    #[tracing::instrument(skip(self), ret)]
    async fn pulls_list(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        head: &str,
    ) -> Result<Vec<GhPullRequest>> {
        Ok(vec![])
    }
}
