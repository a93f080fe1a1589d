use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use depbot_models::{GroupConfigs, Repository};
use shaku::{Component, HasComponent, Interface};
use tracing::{debug, warn};

use crate::{
    diff::{diff_groups, diff_manifests},
    jobs::{DeleteBranchJob, InvalidGroupConfigJob, Job, ManifestChangeEvent},
    use_cases::branches::{
        PlanDependencyRetirementInterface, PlanGroupRetirementInterface, RetiredBranch,
    },
    CoreContext, Result,
};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait HandleManifestChangeInterface: Interface {
    async fn run<'a>(&self, ctx: &CoreContext<'a>, event: ManifestChangeEvent)
        -> Result<Vec<Job>>;
}

#[derive(Component)]
#[shaku(interface = HandleManifestChangeInterface)]
pub(crate) struct HandleManifestChange;

#[async_trait]
impl HandleManifestChangeInterface for HandleManifestChange {
    #[tracing::instrument(
        skip_all,
        fields(
            repository_id = event.repository_id,
            after = %event.after
        )
    )]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        event: ManifestChangeEvent,
    ) -> Result<Vec<Job>> {
        let repository = ctx
            .db_service
            .repositories_get_expect(event.repository_id)
            .await?;
        if repository.last_processed_commit.as_deref() == Some(event.after.as_str()) {
            debug!(
                repository_id = repository.id,
                after = %event.after,
                message = "Commit already processed"
            );
            return Ok(vec![]);
        }

        let mut retired: Vec<RetiredBranch> = vec![];

        let plan_dependency_retirement: &dyn PlanDependencyRetirementInterface =
            ctx.core_module.resolve_ref();
        let paths: BTreeSet<&String> = repository
            .packages
            .keys()
            .chain(event.packages.keys())
            .collect();
        for path in paths {
            let diff = diff_manifests(
                repository.packages.get(path),
                event.packages.get(path),
                repository.group_of_path(path),
            );

            if !diff.is_empty() {
                retired.extend(
                    plan_dependency_retirement
                        .run(ctx, repository.id, &diff)
                        .await?,
                );
            }
        }

        let mut jobs = vec![];
        let groups = match parse_group_config(&event.groups) {
            Ok(groups) => {
                let group_diff = diff_groups(&repository.groups, &groups);
                if !group_diff.is_empty() {
                    let plan_group_retirement: &dyn PlanGroupRetirementInterface =
                        ctx.core_module.resolve_ref();
                    retired.extend(
                        plan_group_retirement
                            .run(ctx, repository.id, &group_diff)
                            .await?,
                    );
                }
                groups
            }
            Err(e) => {
                warn!(
                    repository_id = repository.id,
                    error = %e,
                    message = "Invalid group configuration, keeping previous groups"
                );
                jobs.push(Job::InvalidGroupConfig(InvalidGroupConfigJob {
                    repository_id: repository.id,
                    installation_id: event.installation_id,
                    message: e.to_string(),
                }));
                repository.groups.clone()
            }
        };

        ctx.db_service
            .repositories_mutate(
                repository.id,
                ctx.config.database.max_attempts,
                &|r: &mut Repository| {
                    r.packages.clone_from(&event.packages);
                    r.groups.clone_from(&groups);
                    r.last_processed_commit = Some(event.after.clone());
                },
            )
            .await?;

        // One deletion per branch, first reason wins
        let mut by_id: BTreeMap<u64, RetiredBranch> = BTreeMap::new();
        for entry in retired {
            by_id.entry(entry.branch.id).or_insert(entry);
        }

        let delete_jobs = by_id.into_values().map(|entry| {
            Job::DeleteBranch(DeleteBranchJob {
                repository_id: repository.id,
                installation_id: event.installation_id,
                branch_id: entry.branch.id,
                reason: entry.reason,
            })
        });

        Ok(delete_jobs.chain(jobs).collect())
    }
}

/// A `null` configuration means no groups.
fn parse_group_config(raw: &serde_json::Value) -> serde_json::Result<GroupConfigs> {
    if raw.is_null() {
        Ok(GroupConfigs::new())
    } else {
        serde_json::from_value(raw.clone())
    }
}
