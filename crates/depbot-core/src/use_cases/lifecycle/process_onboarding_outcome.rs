use async_trait::async_trait;
use depbot_models::{Branch, CombinedState, PullRequest, Repository};
use shaku::{Component, Interface};
use tracing::{debug, info};

use crate::{
    jobs::{CommentOnInitialPrJob, InitialPrJob, Job},
    CoreContext, Result,
};

/// Onboarding branches always proceed to a pull request once CI concluded.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ProcessOnboardingOutcomeInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository: &Repository,
        branch: &Branch,
        state: CombinedState,
    ) -> Result<Vec<Job>>;
}

#[derive(Component)]
#[shaku(interface = ProcessOnboardingOutcomeInterface)]
pub(crate) struct ProcessOnboardingOutcome;

#[async_trait]
impl ProcessOnboardingOutcomeInterface for ProcessOnboardingOutcome {
    #[tracing::instrument(
        skip_all,
        fields(
            repository_id = repository.id,
            head = %branch.head,
            state = %state
        ),
        ret
    )]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository: &Repository,
        branch: &Branch,
        state: CombinedState,
    ) -> Result<Vec<Job>> {
        let group_name = if branch.subgroup_initial {
            branch.group_name.as_deref()
        } else {
            None
        };

        if let Some(pull_request) = ctx
            .db_service
            .pull_requests_find_open(repository.id, None, group_name)
            .await?
        {
            if pull_request.confirmation_commented {
                debug!(
                    pull_request_number = pull_request.number,
                    message = "Onboarding pull request already confirmed"
                );
                return Ok(vec![]);
            }

            ctx.db_service
                .pull_requests_mutate(
                    pull_request.id,
                    ctx.config.database.max_attempts,
                    &|p: &mut PullRequest| p.confirmation_commented = true,
                )
                .await?;

            return Ok(vec![comment_job(
                repository,
                branch,
                pull_request.number,
                state,
            )]);
        }

        let repository_path = repository.path()?;
        let existing = ctx
            .api_service
            .pulls_list(
                repository.installation_id,
                repository_path.owner(),
                repository_path.name(),
                &branch.head,
            )
            .await?;

        if let Some(gh_pull_request) = existing.into_iter().next() {
            info!(
                pull_request_number = gh_pull_request.number,
                message = "Onboarding pull request opened externally"
            );

            ctx.db_service
                .pull_requests_create(PullRequest {
                    repository_id: repository.id,
                    number: gh_pull_request.number,
                    head: branch.head.clone(),
                    group_name: group_name.map(Into::into),
                    initial: branch.initial,
                    subgroup_initial: branch.subgroup_initial,
                    confirmation_commented: true,
                    ..Default::default()
                })
                .await?;

            return Ok(vec![comment_job(
                repository,
                branch,
                gh_pull_request.number,
                state,
            )]);
        }

        let job = InitialPrJob {
            repository_id: repository.id,
            installation_id: repository.installation_id,
            branch_id: branch.id,
            head: branch.head.clone(),
            group_name: group_name.map(Into::into),
            state,
        };

        Ok(vec![if branch.subgroup_initial {
            Job::CreateInitialSubgroupPr(job)
        } else {
            Job::CreateInitialPr(job)
        }])
    }
}

fn comment_job(
    repository: &Repository,
    branch: &Branch,
    pull_request_number: u64,
    state: CombinedState,
) -> Job {
    Job::CommentOnInitialPr(CommentOnInitialPrJob {
        repository_id: repository.id,
        installation_id: repository.installation_id,
        pull_request_number,
        branch_id: branch.id,
        state,
    })
}
