use std::collections::BTreeMap;

use async_trait::async_trait;
use depbot_models::{
    Branch, DependencyType, DependencyUsage, Issue, MonorepoRelease, PullRequest,
    RegistrySnapshot, Repository,
};

use crate::{with_retries, DatabaseError, Result};

/// Document store.
///
/// Every `*_update` checks the submitted revision against the stored one,
/// then bumps the revision and `updated_at`.
#[async_trait]
pub trait DbService: Send + Sync {
    async fn health_check(&self) -> Result<()>;

    async fn repositories_create(&self, instance: Repository) -> Result<Repository>;
    async fn repositories_update(&self, instance: Repository) -> Result<Repository>;
    async fn repositories_get(&self, id: u64) -> Result<Option<Repository>>;
    async fn repositories_get_expect(&self, id: u64) -> Result<Repository> {
        self.repositories_get(id)
            .await?
            .ok_or(DatabaseError::UnknownRepositoryId(id))
    }
    async fn repositories_all(&self) -> Result<Vec<Repository>>;
    /// Declarations of any of the dependencies, across every tracked repository.
    async fn repositories_find_dependency_usages(
        &self,
        dependencies: &[String],
    ) -> Result<Vec<DependencyUsage>>;
    async fn repositories_mutate(
        &self,
        id: u64,
        max_attempts: u32,
        apply: &(dyn for<'m> Fn(&'m mut Repository) + Send + Sync),
    ) -> Result<Repository> {
        with_retries(max_attempts, || async move {
            let mut instance = self.repositories_get_expect(id).await?;
            apply(&mut instance);
            self.repositories_update(instance).await
        })
        .await
    }

    async fn branches_create(&self, instance: Branch) -> Result<Branch>;
    async fn branches_update(&self, instance: Branch) -> Result<Branch>;
    async fn branches_get(&self, id: u64) -> Result<Option<Branch>>;
    async fn branches_get_expect(&self, id: u64) -> Result<Branch> {
        self.branches_get(id)
            .await?
            .ok_or(DatabaseError::UnknownBranchId(id))
    }
    /// Lookup by commit, deleted branches included.
    async fn branches_get_by_sha(&self, repository_id: u64, sha: &str) -> Result<Option<Branch>>;
    async fn branches_list_by_dependency(
        &self,
        repository_id: u64,
        dependency: &str,
        dependency_type: DependencyType,
    ) -> Result<Vec<Branch>>;
    async fn branches_list_by_group(
        &self,
        repository_id: u64,
        group_name: &str,
    ) -> Result<Vec<Branch>>;
    async fn branches_list_by_monorepo_group(
        &self,
        repository_id: u64,
        monorepo_group: &str,
    ) -> Result<Vec<Branch>>;
    async fn branches_mutate(
        &self,
        id: u64,
        max_attempts: u32,
        apply: &(dyn for<'m> Fn(&'m mut Branch) + Send + Sync),
    ) -> Result<Branch> {
        with_retries(max_attempts, || async move {
            let mut instance = self.branches_get_expect(id).await?;
            apply(&mut instance);
            self.branches_update(instance).await
        })
        .await
    }

    async fn issues_create(&self, instance: Issue) -> Result<Issue>;
    async fn issues_update(&self, instance: Issue) -> Result<Issue>;
    async fn issues_get(&self, id: u64) -> Result<Option<Issue>>;
    async fn issues_get_expect(&self, id: u64) -> Result<Issue> {
        self.issues_get(id)
            .await?
            .ok_or(DatabaseError::UnknownIssueId(id))
    }
    async fn issues_get_open(&self, repository_id: u64, key: &str) -> Result<Option<Issue>>;
    async fn issues_get_by_number(
        &self,
        repository_id: u64,
        number: u64,
    ) -> Result<Option<Issue>>;
    /// Persist an issue and its pin branch together.
    async fn issues_create_with_pin_branch(
        &self,
        issue: Issue,
        pin_branch: Option<Branch>,
    ) -> Result<(Issue, Option<Branch>)>;
    async fn issues_mutate(
        &self,
        id: u64,
        max_attempts: u32,
        apply: &(dyn for<'m> Fn(&'m mut Issue) + Send + Sync),
    ) -> Result<Issue> {
        with_retries(max_attempts, || async move {
            let mut instance = self.issues_get_expect(id).await?;
            apply(&mut instance);
            self.issues_update(instance).await
        })
        .await
    }

    async fn pull_requests_create(&self, instance: PullRequest) -> Result<PullRequest>;
    async fn pull_requests_update(&self, instance: PullRequest) -> Result<PullRequest>;
    async fn pull_requests_get(&self, id: u64) -> Result<Option<PullRequest>>;
    async fn pull_requests_get_expect(&self, id: u64) -> Result<PullRequest> {
        self.pull_requests_get(id)
            .await?
            .ok_or(DatabaseError::UnknownPullRequestId(id))
    }
    async fn pull_requests_find_open(
        &self,
        repository_id: u64,
        dependency: Option<&str>,
        group_name: Option<&str>,
    ) -> Result<Option<PullRequest>>;
    async fn pull_requests_mutate(
        &self,
        id: u64,
        max_attempts: u32,
        apply: &(dyn for<'m> Fn(&'m mut PullRequest) + Send + Sync),
    ) -> Result<PullRequest> {
        with_retries(max_attempts, || async move {
            let mut instance = self.pull_requests_get_expect(id).await?;
            apply(&mut instance);
            self.pull_requests_update(instance).await
        })
        .await
    }

    /// Fails with `AlreadyExists` when a record for (group, version) exists.
    async fn monorepo_releases_create(&self, instance: MonorepoRelease)
        -> Result<MonorepoRelease>;
    async fn monorepo_releases_update(&self, instance: MonorepoRelease)
        -> Result<MonorepoRelease>;
    async fn monorepo_releases_get(
        &self,
        group: &str,
        version: &str,
    ) -> Result<Option<MonorepoRelease>>;
    async fn monorepo_releases_delete(&self, id: u64) -> Result<bool>;

    /// Fails with `AlreadyExists` when a snapshot for the name exists.
    async fn registry_snapshots_create(
        &self,
        instance: RegistrySnapshot,
    ) -> Result<RegistrySnapshot>;
    async fn registry_snapshots_update(
        &self,
        instance: RegistrySnapshot,
    ) -> Result<RegistrySnapshot>;
    async fn registry_snapshots_get(&self, name: &str) -> Result<Option<RegistrySnapshot>>;
    async fn registry_snapshots_save(
        &self,
        name: &str,
        dist_tags: &BTreeMap<String, String>,
        max_attempts: u32,
    ) -> Result<RegistrySnapshot> {
        with_retries(max_attempts, || async move {
            match self.registry_snapshots_get(name).await? {
                Some(mut snapshot) => {
                    snapshot.dist_tags.clone_from(dist_tags);
                    self.registry_snapshots_update(snapshot).await
                }
                None => {
                    self.registry_snapshots_create(RegistrySnapshot {
                        name: name.into(),
                        dist_tags: dist_tags.clone(),
                        ..Default::default()
                    })
                    .await
                }
            }
        })
        .await
    }
}
