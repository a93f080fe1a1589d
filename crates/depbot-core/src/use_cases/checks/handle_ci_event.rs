use async_trait::async_trait;
use depbot_models::{Branch, BranchPurpose};
use shaku::{Component, HasComponent, Interface};
use tracing::{debug, info};

use crate::{
    jobs::{CiEvent, Job},
    use_cases::{
        checks::AggregateCiSignalsInterface,
        lifecycle::{
            ProcessOnboardingOutcomeInterface, ProcessPinOutcomeInterface,
            ProcessUpdateOutcomeInterface,
        },
    },
    CoreContext, Result,
};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait HandleCiEventInterface: Interface {
    async fn run<'a>(&self, ctx: &CoreContext<'a>, event: CiEvent) -> Result<Vec<Job>>;
}

#[derive(Component)]
#[shaku(interface = HandleCiEventInterface)]
pub(crate) struct HandleCiEvent;

#[async_trait]
impl HandleCiEventInterface for HandleCiEvent {
    #[tracing::instrument(
        skip_all,
        fields(
            repository_id = event.repository_id,
            sha = %event.sha
        )
    )]
    async fn run<'a>(&self, ctx: &CoreContext<'a>, event: CiEvent) -> Result<Vec<Job>> {
        let branch = match ctx
            .db_service
            .branches_get_by_sha(event.repository_id, &event.sha)
            .await?
        {
            Some(branch) => branch,
            None => {
                debug!(sha = %event.sha, message = "Untracked commit");
                return Ok(vec![]);
            }
        };

        if branch.processed {
            debug!(branch_id = branch.id, message = "Branch already processed");
            return Ok(vec![]);
        }

        if is_maintenance_branch(&ctx.config.branch_prefix, &branch.head) {
            debug!(head = %branch.head, message = "Maintenance branch, skipping");
            return Ok(vec![]);
        }

        let repository = ctx
            .db_service
            .repositories_get_expect(branch.repository_id)
            .await?;
        let repository_path = repository.path()?;

        let aggregate_ci_signals: &dyn AggregateCiSignalsInterface = ctx.core_module.resolve_ref();
        let signals = match aggregate_ci_signals
            .run(ctx, event.installation_id, &repository_path, &event.sha)
            .await?
        {
            Some(signals) => signals,
            None => {
                debug!(sha = %event.sha, message = "Outcome not known yet");
                return Ok(vec![]);
            }
        };

        if branch.state == Some(signals.state) {
            debug!(branch_id = branch.id, message = "State unchanged");
            return Ok(vec![]);
        }

        let state = signals.state;
        let jobs = if branch.is_onboarding() {
            let process_onboarding_outcome: &dyn ProcessOnboardingOutcomeInterface =
                ctx.core_module.resolve_ref();
            process_onboarding_outcome
                .run(ctx, &repository, &branch, state)
                .await?
        } else {
            match branch.purpose {
                BranchPurpose::Update => {
                    let process_update_outcome: &dyn ProcessUpdateOutcomeInterface =
                        ctx.core_module.resolve_ref();
                    let outcome = process_update_outcome
                        .run(ctx, &repository, &branch, state)
                        .await?;
                    info!(branch_id = branch.id, outcome = ?outcome, message = "Update outcome");
                }
                BranchPurpose::Pin => {
                    let process_pin_outcome: &dyn ProcessPinOutcomeInterface =
                        ctx.core_module.resolve_ref();
                    process_pin_outcome
                        .run(ctx, &repository, &branch, state)
                        .await?;
                }
            }

            vec![]
        };

        ctx.db_service
            .branches_mutate(
                branch.id,
                ctx.config.database.max_attempts,
                &|b: &mut Branch| {
                    b.processed = true;
                    b.state = Some(state);
                },
            )
            .await?;

        Ok(jobs)
    }
}

/// Node version and deprecation branches only ever produce issues.
fn is_maintenance_branch(branch_prefix: &str, head: &str) -> bool {
    head.strip_prefix(branch_prefix)
        .map(|rest| rest.starts_with("node-version/") || rest.starts_with("deprecation/"))
        .unwrap_or(false)
}
