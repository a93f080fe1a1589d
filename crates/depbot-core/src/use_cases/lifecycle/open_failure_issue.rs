use async_trait::async_trait;
use depbot_models::{Branch, Issue, Repository};
use shaku::{Component, HasComponent, Interface};
use tracing::{info, warn};

use crate::{
    use_cases::lifecycle::{messages, CreatePinBranchInterface},
    CoreContext, Result,
};

/// Open an issue for a failing update, together with its pin branch.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait OpenFailureIssueInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository: &Repository,
        branch: &Branch,
    ) -> Result<Issue>;
}

#[derive(Component)]
#[shaku(interface = OpenFailureIssueInterface)]
pub(crate) struct OpenFailureIssue;

#[async_trait]
impl OpenFailureIssueInterface for OpenFailureIssue {
    #[tracing::instrument(
        skip_all,
        fields(
            repository_id = repository.id,
            key = %branch.issue_key(),
            version = %branch.version
        )
    )]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository: &Repository,
        branch: &Branch,
    ) -> Result<Issue> {
        let repository_path = repository.path()?;
        let (owner, name) = (repository_path.owner(), repository_path.name());

        // A pin failure never blocks the issue record.
        let create_pin_branch: &dyn CreatePinBranchInterface = ctx.core_module.resolve_ref();
        let pin_branch = match create_pin_branch.run(ctx, repository, branch).await {
            Ok(pin_branch) => pin_branch,
            Err(e) => {
                warn!(error = %e, message = "Could not push pin branch");
                None
            }
        };

        let title = messages::failure_issue_title(branch);
        let existing = ctx
            .api_service
            .issues_list_open(repository.installation_id, owner, name, &ctx.config.name)
            .await?
            .into_iter()
            .find(|i| i.title == title);

        let gh_issue = match existing {
            Some(gh_issue) => {
                info!(
                    issue_number = gh_issue.number,
                    message = "Reusing issue left by an interrupted attempt"
                );
                gh_issue
            }
            None => {
                ctx.api_service
                    .issues_create(
                        repository.installation_id,
                        owner,
                        name,
                        &title,
                        &messages::failure_issue_body(
                            branch,
                            pin_branch.as_ref().map(|b| b.head.as_str()),
                        ),
                        &[ctx.config.name.clone()],
                    )
                    .await?
            }
        };

        let (issue, pin_branch) = ctx
            .db_service
            .issues_create_with_pin_branch(
                Issue {
                    repository_id: repository.id,
                    number: gh_issue.number,
                    key: branch.issue_key().into(),
                    dependency_type: branch.dependency_type,
                    version: branch.version.clone(),
                    ..Default::default()
                },
                pin_branch.map(|pin_branch| Branch {
                    issue_number: Some(gh_issue.number),
                    ..pin_branch
                }),
            )
            .await?;

        info!(
            issue_number = issue.number,
            pin_branch = ?pin_branch.map(|b| b.head),
            message = "Failure issue opened"
        );

        Ok(issue)
    }
}
