use async_trait::async_trait;
use depbot_lock_interface::{using_lock, UsingLockResult};
use depbot_models::{Branch, CombinedState, Issue, Repository};
use shaku::{Component, HasComponent, Interface};
use tracing::info;

use crate::{
    jobs::{DeleteBranchJob, RetirementReason},
    use_cases::{
        branches::DeleteBranchInterface,
        lifecycle::{messages, OpenFailureIssueInterface},
    },
    CoreContext, DomainError, Result,
};

/// Side effect applied for an update branch outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Silent success, the branch reference is gone.
    BranchDeleted,
    IssueOpened { number: u64 },
    /// Still failing, version appended to the issue history.
    FailureRecorded { number: u64 },
    /// Version already recorded on the issue.
    DuplicateSuppressed { number: u64 },
    /// Passing again, issue left open.
    RecoveryCommented { number: u64 },
}

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ProcessUpdateOutcomeInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository: &Repository,
        branch: &Branch,
        state: CombinedState,
    ) -> Result<UpdateOutcome>;
}

#[derive(Component)]
#[shaku(interface = ProcessUpdateOutcomeInterface)]
pub(crate) struct ProcessUpdateOutcome;

#[async_trait]
impl ProcessUpdateOutcomeInterface for ProcessUpdateOutcome {
    #[tracing::instrument(
        skip_all,
        fields(
            repository_id = repository.id,
            key = %branch.issue_key(),
            version = %branch.version,
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
    ) -> Result<UpdateOutcome> {
        let lock_name = format!("issue-{}-{}", repository.id, branch.issue_key());

        match using_lock(
            ctx.lock_service,
            &lock_name,
            ctx.config.lock.issue_lock_timeout_ms,
            || self.process(ctx, repository, branch, state),
        )
        .await?
        {
            UsingLockResult::Locked(result) => result,
            UsingLockResult::AlreadyLocked => Err(DomainError::LockTimeout { name: lock_name }),
        }
    }
}

impl ProcessUpdateOutcome {
    async fn process(
        &self,
        ctx: &CoreContext<'_>,
        repository: &Repository,
        branch: &Branch,
        state: CombinedState,
    ) -> Result<UpdateOutcome> {
        let issue = ctx
            .db_service
            .issues_get_open(repository.id, branch.issue_key())
            .await?;

        match (issue, state.is_success()) {
            (None, true) => {
                let delete_branch: &dyn DeleteBranchInterface = ctx.core_module.resolve_ref();
                delete_branch
                    .run(
                        ctx,
                        &DeleteBranchJob {
                            repository_id: repository.id,
                            installation_id: repository.installation_id,
                            branch_id: branch.id,
                            reason: RetirementReason::UpdateSucceeded,
                        },
                    )
                    .await?;

                Ok(UpdateOutcome::BranchDeleted)
            }
            (None, false) => {
                let open_failure_issue: &dyn OpenFailureIssueInterface =
                    ctx.core_module.resolve_ref();
                let issue = open_failure_issue.run(ctx, repository, branch).await?;

                Ok(UpdateOutcome::IssueOpened {
                    number: issue.number,
                })
            }
            (Some(issue), false) => self.record_failure(ctx, repository, branch, issue).await,
            (Some(issue), true) => {
                self.comment(
                    ctx,
                    repository,
                    issue.number,
                    &messages::passing_again_comment(branch),
                )
                .await?;

                Ok(UpdateOutcome::RecoveryCommented {
                    number: issue.number,
                })
            }
        }
    }

    async fn record_failure(
        &self,
        ctx: &CoreContext<'_>,
        repository: &Repository,
        branch: &Branch,
        issue: Issue,
    ) -> Result<UpdateOutcome> {
        if issue.has_seen_version(&branch.version) {
            info!(
                issue_number = issue.number,
                version = %branch.version,
                message = "Failure already recorded on issue"
            );

            return Ok(UpdateOutcome::DuplicateSuppressed {
                number: issue.number,
            });
        }

        let version = branch.version.clone();
        ctx.db_service
            .issues_mutate(
                issue.id,
                ctx.config.database.max_attempts,
                &|i: &mut Issue| {
                    if !i.has_seen_version(&version) {
                        i.comments.push(version.clone());
                    }
                },
            )
            .await?;

        self.comment(
            ctx,
            repository,
            issue.number,
            &messages::still_failing_comment(branch),
        )
        .await?;

        Ok(UpdateOutcome::FailureRecorded {
            number: issue.number,
        })
    }

    async fn comment(
        &self,
        ctx: &CoreContext<'_>,
        repository: &Repository,
        issue_number: u64,
        body: &str,
    ) -> Result<()> {
        let repository_path = repository.path()?;
        ctx.api_service
            .comments_post(
                repository.installation_id,
                repository_path.owner(),
                repository_path.name(),
                issue_number,
                body,
            )
            .await?;

        Ok(())
    }
}
