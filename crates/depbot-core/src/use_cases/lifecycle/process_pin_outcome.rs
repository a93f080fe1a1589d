use async_trait::async_trait;
use depbot_models::{Branch, CombinedState, Repository};
use shaku::{Component, Interface};
use tracing::{debug, error};

use crate::{use_cases::lifecycle::messages, CoreContext, DomainError, Result};

/// Report a pin branch outcome on its originating issue.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ProcessPinOutcomeInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository: &Repository,
        branch: &Branch,
        state: CombinedState,
    ) -> Result<()>;
}

#[derive(Component)]
#[shaku(interface = ProcessPinOutcomeInterface)]
pub(crate) struct ProcessPinOutcome;

#[async_trait]
impl ProcessPinOutcomeInterface for ProcessPinOutcome {
    #[tracing::instrument(
        skip_all,
        fields(
            repository_id = repository.id,
            branch_id = branch.id,
            state = %state
        )
    )]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository: &Repository,
        branch: &Branch,
        state: CombinedState,
    ) -> Result<()> {
        let issue = match branch.issue_number {
            Some(number) => {
                ctx.db_service
                    .issues_get_by_number(repository.id, number)
                    .await?
            }
            None => None,
        };

        let issue = match issue {
            Some(issue) => issue,
            None => {
                error!(
                    repository_id = repository.id,
                    branch_id = branch.id,
                    issue_number = ?branch.issue_number,
                    message = "Pin branch without issue"
                );

                return Err(DomainError::MissingIssueForPin {
                    repository_id: repository.id,
                    branch_id: branch.id,
                    issue_number: branch.issue_number,
                });
            }
        };

        if !issue.is_open() {
            debug!(issue_number = issue.number, message = "Issue closed, skipping");
            return Ok(());
        }

        let repository_path = repository.path()?;
        ctx.api_service
            .comments_post(
                repository.installation_id,
                repository_path.owner(),
                repository_path.name(),
                issue.number,
                &messages::pin_outcome_comment(branch, state),
            )
            .await?;

        Ok(())
    }
}
