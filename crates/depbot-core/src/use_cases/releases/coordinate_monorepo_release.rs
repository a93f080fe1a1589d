use std::collections::BTreeSet;

use async_trait::async_trait;
use depbot_database_interface::{with_retries, DatabaseError};
use depbot_models::MonorepoRelease;
use shaku::{Component, Interface};
use tracing::debug;

use crate::{CoreContext, Result};

/// Outcome of a monorepo release coordination step.
#[derive(Debug, PartialEq, Eq)]
pub enum MonorepoCoordination {
    /// Dependency is not part of a monorepo group.
    NotMonorepo,
    /// Other members did not report the version yet.
    Waiting { group: String, created: bool },
    /// Release can go out for these members.
    Released { group: String, members: Vec<String> },
    /// Release already went out.
    AlreadyReleased,
}

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait CoordinateMonorepoReleaseInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        dependency: &str,
        version: &str,
        force: bool,
    ) -> Result<MonorepoCoordination>;
}

#[derive(Component)]
#[shaku(interface = CoordinateMonorepoReleaseInterface)]
pub(crate) struct CoordinateMonorepoRelease;

#[async_trait]
impl CoordinateMonorepoReleaseInterface for CoordinateMonorepoRelease {
    #[tracing::instrument(skip(self, ctx), ret)]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        dependency: &str,
        version: &str,
        force: bool,
    ) -> Result<MonorepoCoordination> {
        let (group, members) = match ctx.monorepos.group_of(dependency) {
            Some((group, members)) => (group.to_string(), members.to_vec()),
            None => return Ok(MonorepoCoordination::NotMonorepo),
        };

        if force {
            return self.force_release(ctx, group, &members, version).await;
        }

        let group_name = group.as_str();
        let (record, created) = with_retries(ctx.config.database.max_attempts, || async move {
            match ctx
                .db_service
                .monorepo_releases_get(group_name, version)
                .await?
            {
                Some(mut record) => {
                    if record.members.insert(dependency.to_string()) {
                        record = ctx.db_service.monorepo_releases_update(record).await?;
                    }
                    Ok::<_, DatabaseError>((record, false))
                }
                None => {
                    let record = ctx
                        .db_service
                        .monorepo_releases_create(MonorepoRelease {
                            group: group_name.to_string(),
                            version: version.to_string(),
                            members: BTreeSet::from([dependency.to_string()]),
                            ..Default::default()
                        })
                        .await?;
                    Ok::<_, DatabaseError>((record, true))
                }
            }
        })
        .await?;

        if !record.is_complete(&members) {
            return Ok(MonorepoCoordination::Waiting { group, created });
        }

        // Another delivery may have completed the same release
        if ctx.db_service.monorepo_releases_delete(record.id).await? {
            Ok(MonorepoCoordination::Released { group, members })
        } else {
            Ok(MonorepoCoordination::AlreadyReleased)
        }
    }
}

impl CoordinateMonorepoRelease {
    async fn force_release(
        &self,
        ctx: &CoreContext<'_>,
        group: String,
        members: &[String],
        version: &str,
    ) -> Result<MonorepoCoordination> {
        let record = match ctx.db_service.monorepo_releases_get(&group, version).await? {
            Some(record) => record,
            None => {
                debug!(
                    group = %group,
                    version = %version,
                    message = "Monorepo release already went out"
                );
                return Ok(MonorepoCoordination::AlreadyReleased);
            }
        };

        if !ctx.db_service.monorepo_releases_delete(record.id).await? {
            return Ok(MonorepoCoordination::AlreadyReleased);
        }

        // Only members which reported the version
        let members = members
            .iter()
            .filter(|m| record.members.contains(*m))
            .cloned()
            .collect();

        Ok(MonorepoCoordination::Released { group, members })
    }
}
