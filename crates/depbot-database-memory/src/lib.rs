use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        RwLock,
    },
};

use async_trait::async_trait;
use depbot_database_interface::{DatabaseError, DbService, Result};
use depbot_models::{
    Branch, DependencyType, DependencyUsage, Issue, MonorepoRelease, PullRequest,
    RegistrySnapshot, Repository,
};
use time::OffsetDateTime;

#[derive(Debug, Default)]
pub struct MemoryDb {
    repositories: RwLock<HashMap<u64, Repository>>,
    branches: RwLock<HashMap<u64, Branch>>,
    issues: RwLock<HashMap<u64, Issue>>,
    pull_requests: RwLock<HashMap<u64, PullRequest>>,
    monorepo_releases: RwLock<HashMap<u64, MonorepoRelease>>,
    registry_snapshots: RwLock<HashMap<u64, RegistrySnapshot>>,
    ids: IdSequences,
}

/// Per-table id sequences. Ids are never reused, even after a delete.
#[derive(Debug, Default)]
struct IdSequences {
    repositories: AtomicU64,
    branches: AtomicU64,
    issues: AtomicU64,
    pull_requests: AtomicU64,
    monorepo_releases: AtomicU64,
    registry_snapshots: AtomicU64,
}

impl MemoryDb {
    pub fn new() -> Self {
        Default::default()
    }
}

fn next_id(sequence: &AtomicU64) -> u64 {
    sequence.fetch_add(1, Ordering::SeqCst) + 1
}

fn check_revision(kind: &'static str, id: u64, expected: u64, found: u64) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(DatabaseError::RevisionConflict {
            kind,
            id,
            expected,
            found,
        })
    }
}

fn ensure_repository(repositories: &HashMap<u64, Repository>, id: u64) -> Result<()> {
    if repositories.contains_key(&id) {
        Ok(())
    } else {
        Err(DatabaseError::UnknownRepositoryId(id))
    }
}

fn insert_branch(
    sequence: &AtomicU64,
    branches: &mut HashMap<u64, Branch>,
    mut instance: Branch,
) -> Branch {
    let now = OffsetDateTime::now_utc();
    instance.id = next_id(sequence);
    instance.revision = 0;
    instance.created_at = now;
    instance.updated_at = now;
    branches.insert(instance.id, instance.clone());
    instance
}

fn insert_issue(
    sequence: &AtomicU64,
    issues: &mut HashMap<u64, Issue>,
    mut instance: Issue,
) -> Issue {
    let now = OffsetDateTime::now_utc();
    instance.id = next_id(sequence);
    instance.revision = 0;
    instance.created_at = now;
    instance.updated_at = now;
    issues.insert(instance.id, instance.clone());
    instance
}

#[async_trait]
impl DbService for MemoryDb {
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    async fn repositories_create(&self, mut instance: Repository) -> Result<Repository> {
        let mut repositories = self.repositories.write().unwrap();
        let now = OffsetDateTime::now_utc();
        instance.id = next_id(&self.ids.repositories);
        instance.revision = 0;
        instance.created_at = now;
        instance.updated_at = now;

        repositories.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn repositories_update(&self, mut instance: Repository) -> Result<Repository> {
        let mut repositories = self.repositories.write().unwrap();
        let stored = repositories
            .get(&instance.id)
            .ok_or(DatabaseError::UnknownRepositoryId(instance.id))?;
        check_revision("repository", instance.id, instance.revision, stored.revision)?;

        instance.revision += 1;
        instance.created_at = stored.created_at;
        instance.updated_at = OffsetDateTime::now_utc();
        repositories.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn repositories_get(&self, id: u64) -> Result<Option<Repository>> {
        Ok(self.repositories.read().unwrap().get(&id).cloned())
    }

    async fn repositories_all(&self) -> Result<Vec<Repository>> {
        let mut repositories: Vec<_> =
            self.repositories.read().unwrap().values().cloned().collect();
        repositories.sort_by_key(|r| r.id);
        Ok(repositories)
    }

    async fn repositories_find_dependency_usages(
        &self,
        dependencies: &[String],
    ) -> Result<Vec<DependencyUsage>> {
        let mut repositories: Vec<_> =
            self.repositories.read().unwrap().values().cloned().collect();
        repositories.sort_by_key(|r| r.id);

        Ok(repositories
            .iter()
            .flat_map(|r| r.usages_of(dependencies))
            .collect())
    }

    async fn branches_create(&self, instance: Branch) -> Result<Branch> {
        ensure_repository(&self.repositories.read().unwrap(), instance.repository_id)?;

        let mut branches = self.branches.write().unwrap();
        Ok(insert_branch(&self.ids.branches, &mut branches, instance))
    }

    async fn branches_update(&self, mut instance: Branch) -> Result<Branch> {
        let mut branches = self.branches.write().unwrap();
        let stored = branches
            .get(&instance.id)
            .ok_or(DatabaseError::UnknownBranchId(instance.id))?;
        check_revision("branch", instance.id, instance.revision, stored.revision)?;

        instance.revision += 1;
        instance.created_at = stored.created_at;
        instance.updated_at = OffsetDateTime::now_utc();
        branches.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn branches_get(&self, id: u64) -> Result<Option<Branch>> {
        Ok(self.branches.read().unwrap().get(&id).cloned())
    }

    async fn branches_get_by_sha(&self, repository_id: u64, sha: &str) -> Result<Option<Branch>> {
        Ok(self
            .branches
            .read()
            .unwrap()
            .values()
            .filter(|b| b.repository_id == repository_id && b.sha == sha)
            .max_by_key(|b| b.id)
            .cloned())
    }

    async fn branches_list_by_dependency(
        &self,
        repository_id: u64,
        dependency: &str,
        dependency_type: DependencyType,
    ) -> Result<Vec<Branch>> {
        let mut branches: Vec<_> = self
            .branches
            .read()
            .unwrap()
            .values()
            .filter(|b| {
                b.repository_id == repository_id
                    && b.dependency == dependency
                    && b.dependency_type == dependency_type
                    && !b.reference_deleted
            })
            .cloned()
            .collect();
        branches.sort_by_key(|b| b.id);
        Ok(branches)
    }

    async fn branches_list_by_group(
        &self,
        repository_id: u64,
        group_name: &str,
    ) -> Result<Vec<Branch>> {
        let mut branches: Vec<_> = self
            .branches
            .read()
            .unwrap()
            .values()
            .filter(|b| {
                b.repository_id == repository_id
                    && b.group_name.as_deref() == Some(group_name)
                    && !b.reference_deleted
            })
            .cloned()
            .collect();
        branches.sort_by_key(|b| b.id);
        Ok(branches)
    }

    async fn branches_list_by_monorepo_group(
        &self,
        repository_id: u64,
        monorepo_group: &str,
    ) -> Result<Vec<Branch>> {
        let mut branches: Vec<_> = self
            .branches
            .read()
            .unwrap()
            .values()
            .filter(|b| {
                b.repository_id == repository_id
                    && b.monorepo_group.as_deref() == Some(monorepo_group)
                    && !b.reference_deleted
            })
            .cloned()
            .collect();
        branches.sort_by_key(|b| b.id);
        Ok(branches)
    }

    async fn issues_create(&self, instance: Issue) -> Result<Issue> {
        ensure_repository(&self.repositories.read().unwrap(), instance.repository_id)?;

        let mut issues = self.issues.write().unwrap();
        Ok(insert_issue(&self.ids.issues, &mut issues, instance))
    }

    async fn issues_update(&self, mut instance: Issue) -> Result<Issue> {
        let mut issues = self.issues.write().unwrap();
        let stored = issues
            .get(&instance.id)
            .ok_or(DatabaseError::UnknownIssueId(instance.id))?;
        check_revision("issue", instance.id, instance.revision, stored.revision)?;

        instance.revision += 1;
        instance.created_at = stored.created_at;
        instance.updated_at = OffsetDateTime::now_utc();
        issues.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn issues_get(&self, id: u64) -> Result<Option<Issue>> {
        Ok(self.issues.read().unwrap().get(&id).cloned())
    }

    async fn issues_get_open(&self, repository_id: u64, key: &str) -> Result<Option<Issue>> {
        Ok(self
            .issues
            .read()
            .unwrap()
            .values()
            .filter(|i| i.repository_id == repository_id && i.key == key && i.is_open())
            .min_by_key(|i| i.id)
            .cloned())
    }

    async fn issues_get_by_number(
        &self,
        repository_id: u64,
        number: u64,
    ) -> Result<Option<Issue>> {
        Ok(self
            .issues
            .read()
            .unwrap()
            .values()
            .find(|i| i.repository_id == repository_id && i.number == number)
            .cloned())
    }

    async fn issues_create_with_pin_branch(
        &self,
        issue: Issue,
        pin_branch: Option<Branch>,
    ) -> Result<(Issue, Option<Branch>)> {
        ensure_repository(&self.repositories.read().unwrap(), issue.repository_id)?;

        let mut issues = self.issues.write().unwrap();
        let mut branches = self.branches.write().unwrap();
        let issue = insert_issue(&self.ids.issues, &mut issues, issue);
        let pin_branch = pin_branch.map(|b| insert_branch(&self.ids.branches, &mut branches, b));

        Ok((issue, pin_branch))
    }

    async fn pull_requests_create(&self, mut instance: PullRequest) -> Result<PullRequest> {
        ensure_repository(&self.repositories.read().unwrap(), instance.repository_id)?;

        let mut pull_requests = self.pull_requests.write().unwrap();
        let now = OffsetDateTime::now_utc();
        instance.id = next_id(&self.ids.pull_requests);
        instance.revision = 0;
        instance.created_at = now;
        instance.updated_at = now;

        pull_requests.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn pull_requests_update(&self, mut instance: PullRequest) -> Result<PullRequest> {
        let mut pull_requests = self.pull_requests.write().unwrap();
        let stored = pull_requests
            .get(&instance.id)
            .ok_or(DatabaseError::UnknownPullRequestId(instance.id))?;
        check_revision("pull request", instance.id, instance.revision, stored.revision)?;

        instance.revision += 1;
        instance.created_at = stored.created_at;
        instance.updated_at = OffsetDateTime::now_utc();
        pull_requests.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn pull_requests_get(&self, id: u64) -> Result<Option<PullRequest>> {
        Ok(self.pull_requests.read().unwrap().get(&id).cloned())
    }

    async fn pull_requests_find_open(
        &self,
        repository_id: u64,
        dependency: Option<&str>,
        group_name: Option<&str>,
    ) -> Result<Option<PullRequest>> {
        Ok(self
            .pull_requests
            .read()
            .unwrap()
            .values()
            .filter(|p| {
                p.repository_id == repository_id
                    && p.dependency.as_deref() == dependency
                    && p.group_name.as_deref() == group_name
                    && p.is_open()
            })
            .min_by_key(|p| p.id)
            .cloned())
    }

    async fn monorepo_releases_create(
        &self,
        mut instance: MonorepoRelease,
    ) -> Result<MonorepoRelease> {
        let mut releases = self.monorepo_releases.write().unwrap();
        if releases
            .values()
            .any(|r| r.group == instance.group && r.version == instance.version)
        {
            return Err(DatabaseError::AlreadyExists {
                kind: "monorepo release",
                key: format!("{}@{}", instance.group, instance.version),
            });
        }

        let now = OffsetDateTime::now_utc();
        instance.id = next_id(&self.ids.monorepo_releases);
        instance.revision = 0;
        instance.created_at = now;
        instance.updated_at = now;

        releases.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn monorepo_releases_update(
        &self,
        mut instance: MonorepoRelease,
    ) -> Result<MonorepoRelease> {
        let mut releases = self.monorepo_releases.write().unwrap();
        let stored = releases
            .get(&instance.id)
            .ok_or(DatabaseError::UnknownMonorepoReleaseId(instance.id))?;
        check_revision("monorepo release", instance.id, instance.revision, stored.revision)?;

        instance.revision += 1;
        instance.created_at = stored.created_at;
        instance.updated_at = OffsetDateTime::now_utc();
        releases.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn monorepo_releases_get(
        &self,
        group: &str,
        version: &str,
    ) -> Result<Option<MonorepoRelease>> {
        Ok(self
            .monorepo_releases
            .read()
            .unwrap()
            .values()
            .find(|r| r.group == group && r.version == version)
            .cloned())
    }

    async fn monorepo_releases_delete(&self, id: u64) -> Result<bool> {
        Ok(self.monorepo_releases.write().unwrap().remove(&id).is_some())
    }

    async fn registry_snapshots_create(
        &self,
        mut instance: RegistrySnapshot,
    ) -> Result<RegistrySnapshot> {
        let mut snapshots = self.registry_snapshots.write().unwrap();
        if snapshots.values().any(|s| s.name == instance.name) {
            return Err(DatabaseError::AlreadyExists {
                kind: "registry snapshot",
                key: instance.name,
            });
        }

        let now = OffsetDateTime::now_utc();
        instance.id = next_id(&self.ids.registry_snapshots);
        instance.revision = 0;
        instance.created_at = now;
        instance.updated_at = now;

        snapshots.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn registry_snapshots_update(
        &self,
        mut instance: RegistrySnapshot,
    ) -> Result<RegistrySnapshot> {
        let mut snapshots = self.registry_snapshots.write().unwrap();
        let stored = snapshots
            .get(&instance.id)
            .ok_or_else(|| DatabaseError::UnknownRegistrySnapshot(instance.name.clone()))?;
        check_revision("registry snapshot", instance.id, instance.revision, stored.revision)?;

        instance.revision += 1;
        instance.created_at = stored.created_at;
        instance.updated_at = OffsetDateTime::now_utc();
        snapshots.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn registry_snapshots_get(&self, name: &str) -> Result<Option<RegistrySnapshot>> {
        Ok(self
            .registry_snapshots
            .read()
            .unwrap()
            .values()
            .find(|s| s.name == name)
            .cloned())
    }
}
