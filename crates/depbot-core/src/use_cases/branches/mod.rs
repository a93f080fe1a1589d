pub(crate) mod delete_branch;
pub(crate) mod handle_manifest_change;
pub(crate) mod plan_dependency_retirement;
pub(crate) mod plan_group_retirement;

pub use delete_branch::DeleteBranchInterface;
pub use handle_manifest_change::HandleManifestChangeInterface;
pub use plan_dependency_retirement::{PlanDependencyRetirementInterface, RetiredBranch};
pub use plan_group_retirement::PlanGroupRetirementInterface;

#[cfg(any(test, feature = "testkit"))]
pub use self::{
    delete_branch::MockDeleteBranchInterface,
    handle_manifest_change::MockHandleManifestChangeInterface,
    plan_dependency_retirement::MockPlanDependencyRetirementInterface,
    plan_group_retirement::MockPlanGroupRetirementInterface,
};
