use async_trait::async_trait;
use depbot_models::Branch;
use shaku::{Component, Interface};
use tracing::debug;

use crate::{jobs::DeleteBranchJob, CoreContext, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait DeleteBranchInterface: Interface {
    async fn run<'a>(&self, ctx: &CoreContext<'a>, job: &DeleteBranchJob) -> Result<()>;
}

#[derive(Component)]
#[shaku(interface = DeleteBranchInterface)]
pub(crate) struct DeleteBranch;

#[async_trait]
impl DeleteBranchInterface for DeleteBranch {
    #[tracing::instrument(
        skip_all,
        fields(
            repository_id = job.repository_id,
            branch_id = job.branch_id,
            reason = %job.reason
        )
    )]
    async fn run<'a>(&self, ctx: &CoreContext<'a>, job: &DeleteBranchJob) -> Result<()> {
        let branch = ctx.db_service.branches_get_expect(job.branch_id).await?;
        if branch.reference_deleted {
            debug!(
                branch_id = branch.id,
                message = "Branch reference already deleted"
            );
            return Ok(());
        }

        let repository = ctx
            .db_service
            .repositories_get_expect(branch.repository_id)
            .await?;
        let repository_path = repository.path()?;

        match ctx
            .api_service
            .git_refs_delete(
                job.installation_id,
                repository_path.owner(),
                repository_path.name(),
                &branch.head,
            )
            .await
        {
            Ok(()) => (),
            Err(e) if e.is_already_resolved() => {
                debug!(
                    head = %branch.head,
                    error = %e,
                    message = "Branch reference already gone"
                );
            }
            Err(e) => return Err(e.into()),
        }

        ctx.db_service
            .branches_mutate(
                branch.id,
                ctx.config.database.max_attempts,
                &|b: &mut Branch| b.reference_deleted = true,
            )
            .await?;

        Ok(())
    }
}
