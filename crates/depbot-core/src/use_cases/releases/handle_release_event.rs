use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use async_trait::async_trait;
use depbot_models::LATEST_TAG;
use shaku::{Component, HasComponent, Interface};
use tracing::{debug, warn};

use crate::{
    jobs::{Job, MonorepoReleaseTimeoutJob, ReleaseEvent},
    semver_range::{compare_versions, parse_version},
    use_cases::releases::{
        BuildUpdateJobsInterface, CoordinateMonorepoReleaseInterface, MonorepoCoordination,
        ResolvedRelease,
    },
    CoreContext, Result,
};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait HandleReleaseEventInterface: Interface {
    async fn run<'a>(&self, ctx: &CoreContext<'a>, event: ReleaseEvent) -> Result<Vec<Job>>;
}

#[derive(Component)]
#[shaku(interface = HandleReleaseEventInterface)]
pub(crate) struct HandleReleaseEvent;

#[async_trait]
impl HandleReleaseEventInterface for HandleReleaseEvent {
    #[tracing::instrument(
        skip_all,
        fields(
            dependency = %event.dependency,
            dist_tags = ?event.dist_tags,
            force = event.force
        )
    )]
    async fn run<'a>(&self, ctx: &CoreContext<'a>, event: ReleaseEvent) -> Result<Vec<Job>> {
        let previous = ctx
            .db_service
            .registry_snapshots_get(&event.dependency)
            .await?
            .map(|s| s.dist_tags)
            .unwrap_or_default();

        let advanced = determine_advanced_tags(&previous, &event.dist_tags, event.force);

        // A forced release replays an old event, its tags may be outdated
        if !event.force {
            ctx.db_service
                .registry_snapshots_save(
                    &event.dependency,
                    &event.dist_tags,
                    ctx.config.database.max_attempts,
                )
                .await?;
        }

        let version = match event.dist_tags.get(LATEST_TAG) {
            Some(version) if advanced.contains(LATEST_TAG) => version.clone(),
            _ => {
                debug!(
                    dependency = %event.dependency,
                    advanced = ?advanced,
                    message = "Latest tag did not advance"
                );
                return Ok(vec![]);
            }
        };

        let coordinate_monorepo_release: &dyn CoordinateMonorepoReleaseInterface =
            ctx.core_module.resolve_ref();
        let release = match coordinate_monorepo_release
            .run(ctx, &event.dependency, &version, event.force)
            .await?
        {
            MonorepoCoordination::NotMonorepo => ResolvedRelease {
                dependency: event.dependency.clone(),
                dependency_names: vec![event.dependency.clone()],
                monorepo_group: None,
                version,
                versions: event.versions,
            },
            MonorepoCoordination::Released { group, members } => ResolvedRelease {
                dependency: group.clone(),
                dependency_names: members,
                monorepo_group: Some(group),
                version,
                versions: event.versions,
            },
            MonorepoCoordination::Waiting { group, created } => {
                if !created {
                    return Ok(vec![]);
                }

                return Ok(vec![Job::MonorepoReleaseTimeout(
                    MonorepoReleaseTimeoutJob {
                        group,
                        version,
                        dependency: event.dependency,
                        dist_tags: event.dist_tags,
                        versions: event.versions,
                        run_after_secs: ctx.config.monorepo.release_timeout_secs,
                    },
                )]);
            }
            MonorepoCoordination::AlreadyReleased => return Ok(vec![]),
        };

        let build_update_jobs: &dyn BuildUpdateJobsInterface = ctx.core_module.resolve_ref();
        build_update_jobs.run(ctx, &release).await
    }
}

/// Tags whose version moved forward.
///
/// A tag without previous version counts as advanced. `force` always advances `latest`.
fn determine_advanced_tags(
    previous: &BTreeMap<String, String>,
    current: &BTreeMap<String, String>,
    force: bool,
) -> BTreeSet<String> {
    let mut advanced = BTreeSet::new();

    for (tag, version) in current {
        let Some(previous_version) = previous.get(tag) else {
            advanced.insert(tag.clone());
            continue;
        };

        match (parse_version(previous_version), parse_version(version)) {
            (Ok(before), Ok(after)) => {
                if compare_versions(&after, &before) == Ordering::Greater {
                    advanced.insert(tag.clone());
                }
            }
            _ => {
                warn!(
                    tag = %tag,
                    previous = %previous_version,
                    version = %version,
                    message = "Could not compare dist-tag versions"
                );
            }
        }
    }

    if force && current.contains_key(LATEST_TAG) {
        advanced.insert(LATEST_TAG.into());
    }

    advanced
}
