use async_trait::async_trait;
use shaku::{Component, Interface};

use crate::{
    diff::GroupDiff, jobs::RetirementReason, use_cases::branches::RetiredBranch, CoreContext,
    Result,
};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait PlanGroupRetirementInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository_id: u64,
        diff: &GroupDiff,
    ) -> Result<Vec<RetiredBranch>>;
}

#[derive(Component)]
#[shaku(interface = PlanGroupRetirementInterface)]
pub(crate) struct PlanGroupRetirement;

#[async_trait]
impl PlanGroupRetirementInterface for PlanGroupRetirement {
    #[tracing::instrument(skip(self, ctx), ret)]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository_id: u64,
        diff: &GroupDiff,
    ) -> Result<Vec<RetiredBranch>> {
        let groups = diff
            .removed
            .iter()
            .map(|g| (g, RetirementReason::GroupRemoved))
            .chain(
                diff.modified
                    .iter()
                    .map(|g| (g, RetirementReason::GroupModified)),
            );

        let mut retired = vec![];
        for (group_name, reason) in groups {
            for branch in ctx
                .db_service
                .branches_list_by_group(repository_id, group_name)
                .await?
            {
                retired.push(RetiredBranch { branch, reason });
            }
        }

        Ok(retired)
    }
}
