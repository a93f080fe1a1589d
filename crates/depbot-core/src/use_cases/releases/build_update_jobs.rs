use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use async_trait::async_trait;
use depbot_models::DependencyUsage;
use shaku::{Component, Interface};
use tracing::{debug, error, warn};

use crate::{
    jobs::{Job, VersionBranchJob},
    semver_range::{compare_versions, parse_version, VersionRange, VersionRangeError},
    CoreContext, Result,
};

/// Release ready to be turned into update jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRelease {
    /// Dependency name, or monorepo group name.
    pub dependency: String,
    pub dependency_names: Vec<String>,
    pub monorepo_group: Option<String>,
    pub version: String,
    pub versions: BTreeMap<String, serde_json::Value>,
}

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait BuildUpdateJobsInterface: Interface {
    async fn run<'a>(&self, ctx: &CoreContext<'a>, release: &ResolvedRelease) -> Result<Vec<Job>>;
}

#[derive(Component)]
#[shaku(interface = BuildUpdateJobsInterface)]
pub(crate) struct BuildUpdateJobs;

#[async_trait]
impl BuildUpdateJobsInterface for BuildUpdateJobs {
    #[tracing::instrument(
        skip_all,
        fields(
            dependency = %release.dependency,
            version = %release.version,
            dependency_names = ?release.dependency_names
        )
    )]
    async fn run<'a>(&self, ctx: &CoreContext<'a>, release: &ResolvedRelease) -> Result<Vec<Job>> {
        let usages = ctx
            .db_service
            .repositories_find_dependency_usages(&release.dependency_names)
            .await?;

        let mut by_repository: BTreeMap<u64, Vec<DependencyUsage>> = BTreeMap::new();
        for usage in usages {
            if usage.dependency_type.produces_jobs() {
                by_repository
                    .entry(usage.repository_id)
                    .or_default()
                    .push(usage);
            }
        }

        let mut jobs = vec![];
        for (repository_id, usages) in by_repository {
            match self
                .repository_jobs(ctx, release, repository_id, &usages)
                .await
            {
                Ok(repository_jobs) => jobs.extend(repository_jobs),
                Err(e) => {
                    error!(
                        repository_id = repository_id,
                        error = %e,
                        message = "Could not build update jobs for repository"
                    );
                }
            }
        }

        Ok(jobs)
    }
}

impl BuildUpdateJobs {
    async fn repository_jobs(
        &self,
        ctx: &CoreContext<'_>,
        release: &ResolvedRelease,
        repository_id: u64,
        usages: &[DependencyUsage],
    ) -> Result<Vec<Job>> {
        let repository = ctx.db_service.repositories_get_expect(repository_id).await?;
        if !repository.enabled {
            debug!(
                repository_id = repository_id,
                message = "Repository is disabled, skipping"
            );
            return Ok(vec![]);
        }

        let all_usages: Vec<&DependencyUsage> = usages.iter().collect();
        if !repository.is_multi_manifest() {
            let Some(best) = best_usage(&all_usages) else {
                return Ok(vec![]);
            };

            let old_version_resolved =
                match resolve_old_version(&best.range, &release.versions, &release.version) {
                    Ok(resolved) => resolved,
                    Err(e) => {
                        warn!(
                            repository_id = repository_id,
                            range = %best.range,
                            error = %e,
                            message = "Could not resolve old version"
                        );
                        None
                    }
                };

            return Ok(vec![Job::CreateVersionBranch(version_job(
                release,
                best,
                &all_usages,
                None,
                old_version_resolved,
            ))]);
        }

        let mut jobs = vec![];
        let mut ungrouped: Vec<&DependencyUsage> = usages
            .iter()
            .filter(|u| repository.group_of_path(&u.path).is_none())
            .collect();

        for (group_name, group) in &repository.groups {
            let group_usages: Vec<&DependencyUsage> = usages
                .iter()
                .filter(|u| group.owns_path(&u.path) && !group.ignores(&u.dependency))
                .collect();

            if let Some(best) = best_usage(&group_usages) {
                jobs.push(Job::CreateGroupVersionBranch(version_job(
                    release,
                    best,
                    &group_usages,
                    Some(group_name),
                    None,
                )));
            }
        }

        // Paths outside of every group are updated together
        ungrouped.sort_by(|a, b| a.path.cmp(&b.path));
        if let Some(best) = best_usage(&ungrouped) {
            jobs.push(Job::CreateVersionBranch(version_job(
                release, best, &ungrouped, None, None,
            )));
        }

        Ok(jobs)
    }
}

/// Usage with the highest-priority dependency type.
fn best_usage<'u>(usages: &[&'u DependencyUsage]) -> Option<&'u DependencyUsage> {
    usages
        .iter()
        .copied()
        .min_by_key(|u| (u.dependency_type.priority(), u.path.clone()))
}

fn version_job(
    release: &ResolvedRelease,
    best: &DependencyUsage,
    usages: &[&DependencyUsage],
    group_name: Option<&str>,
    old_version_resolved: Option<String>,
) -> VersionBranchJob {
    let paths: BTreeSet<String> = usages.iter().map(|u| u.path.clone()).collect();

    VersionBranchJob {
        repository_id: best.repository_id,
        installation_id: best.installation_id,
        dependency: release.dependency.clone(),
        dependency_names: release.dependency_names.clone(),
        dependency_type: best.dependency_type,
        priority: best.dependency_type.priority(),
        version: release.version.clone(),
        versions: release.versions.clone(),
        old_version: Some(best.range.clone()),
        old_version_resolved,
        group_name: group_name.map(Into::into),
        monorepo_group: release.monorepo_group.clone(),
        paths: paths.into_iter().collect(),
    }
}

/// Highest published version satisfying the old requirement, other than the new version.
pub(crate) fn resolve_old_version(
    range: &str,
    versions: &BTreeMap<String, serde_json::Value>,
    new_version: &str,
) -> std::result::Result<Option<String>, VersionRangeError> {
    let range = VersionRange::parse(range)?;
    let new_version = parse_version(new_version).ok();

    let mut candidates: Vec<_> = versions
        .keys()
        .filter_map(|v| parse_version(v).ok())
        .filter(|v| range.satisfies(v))
        .collect();
    candidates.sort_by(|a, b| compare_versions(b, a));

    Ok(candidates
        .into_iter()
        .find(|v| {
            new_version
                .as_ref()
                .map_or(true, |n| compare_versions(v, n) != Ordering::Equal)
        })
        .map(|v| v.to_string()))
}

#[cfg(test)]
mod tests {
    use depbot_database_interface::DbService;
    use depbot_models::{DependencyType, GroupConfig, Manifest, Repository};
    use maplit::btreemap;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::context::tests::CoreContextTest;

    fn versions() -> BTreeMap<String, serde_json::Value> {
        btreemap! {
            "4.17.19".to_string() => json!({}),
            "4.17.20".to_string() => json!({}),
            "4.17.21".to_string() => json!({}),
            "5.0.0-beta.1".to_string() => json!({}),
        }
    }

    fn release() -> ResolvedRelease {
        ResolvedRelease {
            dependency: "lodash".into(),
            dependency_names: vec!["lodash".into()],
            monorepo_group: None,
            version: "4.17.21".into(),
            versions: versions(),
        }
    }

    fn single_manifest(full_name: &str, dependency_type: DependencyType, range: &str) -> Repository {
        Repository {
            full_name: full_name.into(),
            installation_id: 9,
            packages: btreemap! {
                "package.json".into() => Manifest::default().with_dependency(dependency_type, "lodash", range)
            },
            ..Default::default()
        }
    }

    #[test]
    fn old_version_skips_the_new_one() {
        assert_eq!(
            resolve_old_version("^4.17.0", &versions(), "4.17.21").unwrap(),
            Some("4.17.20".into())
        );
        assert_eq!(
            resolve_old_version("~4.17.19", &versions(), "5.0.0").unwrap(),
            Some("4.17.21".into())
        );
        assert_eq!(resolve_old_version("^3.0.0", &versions(), "4.17.21").unwrap(), None);
        assert!(resolve_old_version("github:lodash/lodash", &versions(), "4.17.21").is_err());
    }

    #[tokio::test]
    async fn peer_only_repositories_are_skipped() {
        let ctx = CoreContextTest::new();
        let first = ctx
            .db_service
            .repositories_create(single_manifest("me/first", DependencyType::Dependencies, "^4.17.0"))
            .await
            .unwrap();
        let second = ctx
            .db_service
            .repositories_create(Repository {
                packages: btreemap! {
                    "package.json".into() => Manifest::default()
                        .with_dependency(DependencyType::DevDependencies, "lodash", "^4.0.0")
                        .with_dependency(DependencyType::Dependencies, "lodash", "^4.17.0")
                },
                ..single_manifest("me/second", DependencyType::Dependencies, "^4.17.0")
            })
            .await
            .unwrap();
        ctx.db_service
            .repositories_create(single_manifest("me/third", DependencyType::PeerDependencies, "^4.0.0"))
            .await
            .unwrap();

        let jobs = BuildUpdateJobs
            .run(&ctx.as_context(), &release())
            .await
            .unwrap();

        assert_eq!(
            jobs,
            vec![
                Job::CreateVersionBranch(VersionBranchJob {
                    repository_id: first.id,
                    installation_id: 9,
                    dependency: "lodash".into(),
                    dependency_names: vec!["lodash".into()],
                    dependency_type: DependencyType::Dependencies,
                    priority: 0,
                    version: "4.17.21".into(),
                    versions: versions(),
                    old_version: Some("^4.17.0".into()),
                    old_version_resolved: Some("4.17.20".into()),
                    group_name: None,
                    monorepo_group: None,
                    paths: vec!["package.json".into()],
                }),
                Job::CreateVersionBranch(VersionBranchJob {
                    repository_id: second.id,
                    installation_id: 9,
                    dependency: "lodash".into(),
                    dependency_names: vec!["lodash".into()],
                    dependency_type: DependencyType::Dependencies,
                    priority: 0,
                    version: "4.17.21".into(),
                    versions: versions(),
                    old_version: Some("^4.17.0".into()),
                    old_version_resolved: Some("4.17.20".into()),
                    group_name: None,
                    monorepo_group: None,
                    paths: vec!["package.json".into()],
                }),
            ]
        );
    }

    #[tokio::test]
    async fn disabled_repositories_and_bad_ranges() {
        let ctx = CoreContextTest::new();
        ctx.db_service
            .repositories_create(Repository {
                enabled: false,
                ..single_manifest("me/disabled", DependencyType::Dependencies, "^4.17.0")
            })
            .await
            .unwrap();
        let unparsable = ctx
            .db_service
            .repositories_create(single_manifest(
                "me/git",
                DependencyType::Dependencies,
                "github:lodash/lodash",
            ))
            .await
            .unwrap();

        let jobs = BuildUpdateJobs
            .run(&ctx.as_context(), &release())
            .await
            .unwrap();

        assert_eq!(jobs.len(), 1);
        let Job::CreateVersionBranch(job) = &jobs[0] else {
            panic!("unexpected job {:?}", jobs[0]);
        };
        assert_eq!(job.repository_id, unparsable.id);
        assert_eq!(job.old_version_resolved, None);
    }

    #[tokio::test]
    async fn multi_manifest_repositories_get_one_job_per_group() {
        let ctx = CoreContextTest::new();
        let repository = ctx
            .db_service
            .repositories_create(Repository {
                full_name: "me/mono".into(),
                installation_id: 9,
                packages: btreemap! {
                    "front/package.json".into() => Manifest::default()
                        .with_dependency(DependencyType::DevDependencies, "lodash", "^4.0.0"),
                    "back/package.json".into() => Manifest::default()
                        .with_dependency(DependencyType::Dependencies, "lodash", "^4.17.0"),
                    "tools/package.json".into() => Manifest::default()
                        .with_dependency(DependencyType::Dependencies, "lodash", "^4.1.0"),
                    "docs/package.json".into() => Manifest::default()
                        .with_dependency(DependencyType::Dependencies, "lodash", "^4.2.0"),
                },
                groups: btreemap! {
                    "backend".into() => GroupConfig {
                        packages: vec!["back/package.json".into()],
                        ignore: vec![],
                    },
                    "frontend".into() => GroupConfig {
                        packages: vec!["front/package.json".into()],
                        ignore: vec![],
                    },
                    "tooling".into() => GroupConfig {
                        packages: vec!["tools/package.json".into()],
                        ignore: vec!["lodash".into()],
                    },
                },
                ..Default::default()
            })
            .await
            .unwrap();

        let jobs = BuildUpdateJobs
            .run(&ctx.as_context(), &release())
            .await
            .unwrap();

        let summary: Vec<_> = jobs
            .iter()
            .map(|job| match job {
                Job::CreateGroupVersionBranch(j) | Job::CreateVersionBranch(j) => (
                    job.name(),
                    j.repository_id,
                    j.group_name.clone(),
                    j.dependency_type,
                    j.paths.clone(),
                    j.old_version_resolved.clone(),
                ),
                other => panic!("unexpected job {other:?}"),
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                (
                    "create-group-version-branch",
                    repository.id,
                    Some("backend".to_string()),
                    DependencyType::Dependencies,
                    vec!["back/package.json".to_string()],
                    None
                ),
                (
                    "create-group-version-branch",
                    repository.id,
                    Some("frontend".to_string()),
                    DependencyType::DevDependencies,
                    vec!["front/package.json".to_string()],
                    None
                ),
                (
                    "create-version-branch",
                    repository.id,
                    None,
                    DependencyType::Dependencies,
                    vec!["docs/package.json".to_string()],
                    None
                ),
            ]
        );
    }
}
