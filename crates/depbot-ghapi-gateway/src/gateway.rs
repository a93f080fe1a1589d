use std::time::Duration;

use async_trait::async_trait;
use depbot_config::ApiConfig;
use depbot_ghapi_interface::{
    types::{GhCheckRunList, GhCommitStatusItem, GhFileContent, GhIssue, GhPullRequest},
    ApiError, ApiService, Result,
};
use futures::Future;
use tracing::warn;

use crate::{BoundedBackoff, RequestQueue};

/// API service routing every call through the read or write queue,
/// with bounded retries on transient errors.
pub struct GatewayApiService {
    inner: Box<dyn ApiService>,
    reads: RequestQueue,
    writes: RequestQueue,
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl GatewayApiService {
    pub fn new(inner: Box<dyn ApiService>, config: &ApiConfig) -> Self {
        Self {
            inner,
            reads: RequestQueue::bounded("reads", config.read_concurrency),
            writes: RequestQueue::serial("writes"),
            max_attempts: config.max_attempts,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }

    async fn read<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.enqueue(&self.reads, operation, call).await
    }

    async fn write<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.enqueue(&self.writes, operation, call).await
    }

    // The permit is held across retries.
    async fn enqueue<T, F, Fut>(
        &self,
        queue: &RequestQueue,
        operation: &'static str,
        mut call: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let _permit = queue.acquire().await?;
        let backoff = BoundedBackoff::new(self.max_attempts, self.initial_backoff, self.max_backoff);

        backoff::future::retry_notify(
            backoff,
            || {
                let fut = call();
                async move {
                    fut.await.map_err(|e| {
                        if e.is_transient() {
                            backoff::Error::transient(e)
                        } else {
                            backoff::Error::permanent(e)
                        }
                    })
                }
            },
            |e: ApiError, delay: Duration| {
                warn!(
                    queue = queue.name(),
                    operation = operation,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    message = "Transient API error, retrying"
                )
            },
        )
        .await
    }
}

#[async_trait]
impl ApiService for GatewayApiService {
    async fn commit_statuses_list(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        git_ref: &str,
    ) -> Result<Vec<GhCommitStatusItem>> {
        self.read("commit_statuses_list", || {
            self.inner
                .commit_statuses_list(installation_id, owner, name, git_ref)
        })
        .await
    }

    async fn check_runs_list(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        git_ref: &str,
    ) -> Result<GhCheckRunList> {
        self.read("check_runs_list", || {
            self.inner
                .check_runs_list(installation_id, owner, name, git_ref)
        })
        .await
    }

    async fn git_refs_get_sha(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<String> {
        self.read("git_refs_get_sha", || {
            self.inner
                .git_refs_get_sha(installation_id, owner, name, branch)
        })
        .await
    }

    async fn git_refs_create(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        branch: &str,
        sha: &str,
    ) -> Result<()> {
        self.write("git_refs_create", || {
            self.inner
                .git_refs_create(installation_id, owner, name, branch, sha)
        })
        .await
    }

    async fn git_refs_delete(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<()> {
        self.write("git_refs_delete", || {
            self.inner
                .git_refs_delete(installation_id, owner, name, branch)
        })
        .await
    }

    async fn contents_get(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<GhFileContent> {
        self.read("contents_get", || {
            self.inner
                .contents_get(installation_id, owner, name, path, git_ref)
        })
        .await
    }

    async fn contents_update(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        branch: &str,
        file: &GhFileContent,
        message: &str,
    ) -> Result<String> {
        self.write("contents_update", || {
            self.inner
                .contents_update(installation_id, owner, name, branch, file, message)
        })
        .await
    }

    async fn issues_create(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<GhIssue> {
        self.write("issues_create", || {
            self.inner
                .issues_create(installation_id, owner, name, title, body, labels)
        })
        .await
    }

    async fn comments_post(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<u64> {
        self.write("comments_post", || {
            self.inner
                .comments_post(installation_id, owner, name, issue_number, body)
        })
        .await
    }

    async fn issues_list_open(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        label: &str,
    ) -> Result<Vec<GhIssue>> {
        self.read("issues_list_open", || {
            self.inner
                .issues_list_open(installation_id, owner, name, label)
        })
        .await
    }

    async fn pulls_list(
        &self,
        installation_id: u64,
        owner: &str,
        name: &str,
        head: &str,
    ) -> Result<Vec<GhPullRequest>> {
        self.read("pulls_list", || {
            self.inner.pulls_list(installation_id, owner, name, head)
        })
        .await
    }
}
