use async_trait::async_trait;
use depbot_models::Branch;
use shaku::{Component, Interface};
use tracing::warn;

use crate::{
    diff::{DependencyChange, DependencyDiff},
    jobs::RetirementReason,
    semver_range::{parse_version, VersionRange},
    CoreContext, Result,
};

/// Branch selected for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetiredBranch {
    pub branch: Branch,
    pub reason: RetirementReason,
}

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait PlanDependencyRetirementInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository_id: u64,
        diff: &DependencyDiff,
    ) -> Result<Vec<RetiredBranch>>;
}

#[derive(Component)]
#[shaku(interface = PlanDependencyRetirementInterface)]
pub(crate) struct PlanDependencyRetirement;

#[async_trait]
impl PlanDependencyRetirementInterface for PlanDependencyRetirement {
    #[tracing::instrument(skip(self, ctx, diff), fields(group_name = ?diff.group_name), ret)]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository_id: u64,
        diff: &DependencyDiff,
    ) -> Result<Vec<RetiredBranch>> {
        let mut retired = vec![];

        for (dependency_type, dependency, change) in diff.iter() {
            if change.is_added() {
                continue;
            }

            let mut candidates = ctx
                .db_service
                .branches_list_by_dependency(repository_id, dependency, dependency_type)
                .await?;

            // Monorepo branches are recorded under the group name
            if let Some((group, _)) = ctx.monorepos.group_of(dependency) {
                for branch in ctx
                    .db_service
                    .branches_list_by_monorepo_group(repository_id, group)
                    .await?
                {
                    if branch.dependency_type == dependency_type
                        && !candidates.iter().any(|c| c.id == branch.id)
                    {
                        candidates.push(branch);
                    }
                }
            }

            for branch in candidates {
                if branch.group_name != diff.group_name {
                    continue;
                }

                if let Some(reason) = retirement_reason(&branch, change) {
                    retired.push(RetiredBranch { branch, reason });
                }
            }
        }

        Ok(retired)
    }
}

fn retirement_reason(branch: &Branch, change: &DependencyChange) -> Option<RetirementReason> {
    let Some(requirement) = change.after() else {
        return Some(RetirementReason::DependencyRemoved);
    };

    let range = match VersionRange::parse(requirement) {
        Ok(range) => range,
        Err(e) => {
            warn!(
                branch_id = branch.id,
                requirement = %requirement,
                error = %e,
                message = "Unsupported requirement, keeping branch"
            );
            return None;
        }
    };

    let version = match parse_version(&branch.version) {
        Ok(version) => version,
        Err(e) => {
            warn!(
                branch_id = branch.id,
                version = %branch.version,
                error = %e,
                message = "Invalid branch version, keeping branch"
            );
            return None;
        }
    };

    if range.satisfies(&version) {
        Some(RetirementReason::SatisfiedByNewRange)
    } else if range.is_below(&version) {
        Some(RetirementReason::BelowNewRange)
    } else if range.is_above(&version) {
        Some(RetirementReason::AboveNewRange)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use depbot_database_interface::DbService;
    use depbot_models::{DependencyType, Repository};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::context::tests::CoreContextTest;

    fn modified(before: &str, after: &str) -> DependencyChange {
        DependencyChange::Modified {
            before: before.into(),
            after: after.into(),
        }
    }

    fn diff(
        entries: Vec<(DependencyType, &str, DependencyChange)>,
        group_name: Option<&str>,
    ) -> DependencyDiff {
        DependencyDiff {
            group_name: group_name.map(Into::into),
            entries: entries
                .into_iter()
                .map(|(t, d, c)| ((t, d.to_string()), c))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    async fn create_branch(ctx: &CoreContextTest, repository_id: u64, branch: Branch) -> Branch {
        ctx.db_service
            .branches_create(Branch {
                repository_id,
                ..branch
            })
            .await
            .unwrap()
    }

    #[test]
    fn reasons() {
        let branch = |version: &str| Branch {
            version: version.into(),
            ..Default::default()
        };

        assert_eq!(
            retirement_reason(&branch("1.2.0"), &modified("^1.0.0", "^1.2.0")),
            Some(RetirementReason::SatisfiedByNewRange)
        );
        assert_eq!(
            retirement_reason(&branch("2.0.0"), &modified("^1.0.0", "^1.2.0")),
            Some(RetirementReason::AboveNewRange)
        );
        assert_eq!(
            retirement_reason(&branch("1.2.0"), &modified("^1.0.0", "^3.0.0")),
            Some(RetirementReason::BelowNewRange)
        );
        assert_eq!(
            retirement_reason(
                &branch("1.2.0"),
                &DependencyChange::Removed {
                    before: "^1.0.0".into()
                }
            ),
            Some(RetirementReason::DependencyRemoved)
        );
        assert_eq!(
            retirement_reason(&branch("1.2.0"), &modified("^1.0.0", "github:me/x")),
            None
        );
        assert_eq!(
            retirement_reason(&branch("1.5.0"), &modified("^1.0.0", "<1.0.0 || >2.0.0")),
            None
        );
    }

    #[tokio::test]
    async fn only_matching_branches_are_retired() {
        let ctx = CoreContextTest::new();
        let repository = ctx
            .db_service
            .repositories_create(Repository::default())
            .await
            .unwrap();

        let x_branch = create_branch(
            &ctx,
            repository.id,
            Branch {
                dependency: "x".into(),
                version: "1.2.0".into(),
                ..Default::default()
            },
        )
        .await;
        // Other dependency
        create_branch(
            &ctx,
            repository.id,
            Branch {
                dependency: "y".into(),
                version: "1.2.0".into(),
                ..Default::default()
            },
        )
        .await;
        // Same dependency, other group
        create_branch(
            &ctx,
            repository.id,
            Branch {
                dependency: "x".into(),
                version: "1.2.0".into(),
                group_name: Some("frontend".into()),
                ..Default::default()
            },
        )
        .await;
        // Same dependency, other type
        create_branch(
            &ctx,
            repository.id,
            Branch {
                dependency: "x".into(),
                dependency_type: DependencyType::DevDependencies,
                version: "1.2.0".into(),
                ..Default::default()
            },
        )
        .await;

        let retired = PlanDependencyRetirement
            .run(
                &ctx.as_context(),
                repository.id,
                &diff(
                    vec![(DependencyType::Dependencies, "x", modified("^1.0.0", "^1.2.0"))],
                    None,
                ),
            )
            .await
            .unwrap();

        assert_eq!(
            retired,
            vec![RetiredBranch {
                branch: x_branch,
                reason: RetirementReason::SatisfiedByNewRange
            }]
        );
    }

    #[tokio::test]
    async fn added_dependencies_and_monorepo_branches() {
        let ctx = CoreContextTest::new();
        let repository = ctx
            .db_service
            .repositories_create(Repository::default())
            .await
            .unwrap();

        let react_branch = create_branch(
            &ctx,
            repository.id,
            Branch {
                dependency: "react".into(),
                monorepo_group: Some("react".into()),
                version: "18.0.0".into(),
                ..Default::default()
            },
        )
        .await;
        create_branch(
            &ctx,
            repository.id,
            Branch {
                dependency: "lodash".into(),
                version: "4.17.21".into(),
                ..Default::default()
            },
        )
        .await;

        let retired = PlanDependencyRetirement
            .run(
                &ctx.as_context(),
                repository.id,
                &diff(
                    vec![
                        (
                            DependencyType::Dependencies,
                            "lodash",
                            DependencyChange::Added {
                                after: "^4.17.21".into(),
                            },
                        ),
                        (
                            DependencyType::Dependencies,
                            "react-dom",
                            DependencyChange::Removed {
                                before: "^17.0.0".into(),
                            },
                        ),
                    ],
                    None,
                ),
            )
            .await
            .unwrap();

        assert_eq!(
            retired,
            vec![RetiredBranch {
                branch: react_branch,
                reason: RetirementReason::DependencyRemoved
            }]
        );
    }
}
