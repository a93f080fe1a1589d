use std::collections::HashMap;

use async_trait::async_trait;
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use shaku::{Component, HasComponent, Interface};
use tracing::warn;

use crate::{
    jobs::{CiEvent, DeleteBranchJob, Job, ManifestChangeEvent, MonorepoReleaseTimeoutJob, ReleaseEvent},
    use_cases::{
        branches::{DeleteBranchInterface, HandleManifestChangeInterface},
        checks::HandleCiEventInterface,
        releases::HandleReleaseEventInterface,
    },
    CoreContext, DomainError, Result,
};

/// Inbound job handled by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    RegistryChange,
    Status,
    CheckRun,
    Push,
    MonorepoReleaseTimeout,
    DeleteBranch,
}

lazy_static! {
    static ref JOB_KINDS: HashMap<&'static str, JobKind> = HashMap::from([
        ("registry-change", JobKind::RegistryChange),
        ("status", JobKind::Status),
        ("check-run", JobKind::CheckRun),
        ("push", JobKind::Push),
        ("monorepo-release-timeout", JobKind::MonorepoReleaseTimeout),
        ("delete-branch", JobKind::DeleteBranch),
    ]);
}

impl JobKind {
    pub fn from_name(name: &str) -> Option<Self> {
        JOB_KINDS.get(name).copied()
    }
}

/// Route a queued job to its use case.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ProcessJobInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        name: &str,
        payload: serde_json::Value,
    ) -> Result<Vec<Job>>;
}

#[derive(Component)]
#[shaku(interface = ProcessJobInterface)]
pub(crate) struct ProcessJob;

#[async_trait]
impl ProcessJobInterface for ProcessJob {
    #[tracing::instrument(skip(self, ctx, payload))]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        name: &str,
        payload: serde_json::Value,
    ) -> Result<Vec<Job>> {
        let kind = match JobKind::from_name(name) {
            Some(kind) => kind,
            None => {
                warn!(name = name, message = "Unknown job, ignoring");
                return Ok(vec![]);
            }
        };

        match kind {
            JobKind::RegistryChange => {
                let event: ReleaseEvent = parse_payload(name, payload)?;
                let handle_release_event: &dyn HandleReleaseEventInterface =
                    ctx.core_module.resolve_ref();
                handle_release_event.run(ctx, event).await
            }
            JobKind::Status | JobKind::CheckRun => {
                let event: CiEvent = parse_payload(name, payload)?;
                let handle_ci_event: &dyn HandleCiEventInterface = ctx.core_module.resolve_ref();
                handle_ci_event.run(ctx, event).await
            }
            JobKind::Push => {
                let event: ManifestChangeEvent = parse_payload(name, payload)?;
                let handle_manifest_change: &dyn HandleManifestChangeInterface =
                    ctx.core_module.resolve_ref();
                handle_manifest_change.run(ctx, event).await
            }
            JobKind::MonorepoReleaseTimeout => {
                let job: MonorepoReleaseTimeoutJob = parse_payload(name, payload)?;
                let handle_release_event: &dyn HandleReleaseEventInterface =
                    ctx.core_module.resolve_ref();
                handle_release_event
                    .run(
                        ctx,
                        ReleaseEvent {
                            dependency: job.dependency,
                            dist_tags: job.dist_tags,
                            versions: job.versions,
                            force: true,
                        },
                    )
                    .await
            }
            JobKind::DeleteBranch => {
                let job: DeleteBranchJob = parse_payload(name, payload)?;
                let delete_branch: &dyn DeleteBranchInterface = ctx.core_module.resolve_ref();
                delete_branch.run(ctx, &job).await?;
                Ok(vec![])
            }
        }
    }
}

fn parse_payload<T: DeserializeOwned>(name: &str, payload: serde_json::Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|source| DomainError::InvalidPayload {
        name: name.into(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        context::tests::CoreContextTest,
        jobs::RetirementReason,
        use_cases::{
            branches::MockDeleteBranchInterface, checks::MockHandleCiEventInterface,
            releases::MockHandleReleaseEventInterface,
        },
        CoreModule,
    };

    #[test]
    fn kinds_by_name() {
        assert_eq!(JobKind::from_name("check-run"), Some(JobKind::CheckRun));
        assert_eq!(JobKind::from_name("push"), Some(JobKind::Push));
        assert_eq!(JobKind::from_name("create-version-branch"), None);
    }

    #[tokio::test]
    async fn unknown_job_is_ignored() {
        let ctx = CoreContextTest::new();

        assert_eq!(
            ProcessJob
                .run(&ctx.as_context(), "send-invoice", json!({}))
                .await
                .unwrap(),
            vec![]
        );
    }

    #[tokio::test]
    async fn malformed_payload_fails() {
        let ctx = CoreContextTest::new();

        assert!(matches!(
            ProcessJob
                .run(&ctx.as_context(), "status", json!({"sha": 12}))
                .await,
            Err(DomainError::InvalidPayload { name, .. }) if name == "status"
        ));
    }

    #[tokio::test]
    async fn statuses_and_check_runs_share_a_handler() {
        let mut ctx = CoreContextTest::new();
        ctx.core_module = CoreModule::builder()
            .with_component_override::<dyn HandleCiEventInterface>(Box::new({
                let mut mock = MockHandleCiEventInterface::new();
                mock.expect_run()
                    .times(2)
                    .withf(|_, event| event.repository_id == 1 && event.sha == "abcdef")
                    .returning(|_, _| Ok(vec![]));
                mock
            }))
            .build();

        let payload = json!({"repository_id": 1, "installation_id": 2, "sha": "abcdef"});
        for name in ["status", "check-run"] {
            ProcessJob
                .run(&ctx.as_context(), name, payload.clone())
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn timeout_forces_release() {
        let mut ctx = CoreContextTest::new();
        ctx.core_module = CoreModule::builder()
            .with_component_override::<dyn HandleReleaseEventInterface>(Box::new({
                let mut mock = MockHandleReleaseEventInterface::new();
                mock.expect_run()
                    .once()
                    .withf(|_, event| {
                        event.dependency == "@babel/core"
                            && event.force
                            && event.dist_tags.get("latest").map(String::as_str) == Some("7.0.0")
                    })
                    .return_once(|_, _| Ok(vec![]));
                mock
            }))
            .build();

        let payload = serde_json::to_value(MonorepoReleaseTimeoutJob {
            group: "babel7".into(),
            version: "7.0.0".into(),
            dependency: "@babel/core".into(),
            dist_tags: btreemap! { "latest".into() => "7.0.0".into() },
            versions: btreemap! {},
            run_after_secs: 1800,
        })
        .unwrap();

        ProcessJob
            .run(&ctx.as_context(), "monorepo-release-timeout", payload)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_branch_emits_nothing() {
        let mut ctx = CoreContextTest::new();
        ctx.core_module = CoreModule::builder()
            .with_component_override::<dyn DeleteBranchInterface>(Box::new({
                let mut mock = MockDeleteBranchInterface::new();
                mock.expect_run()
                    .once()
                    .withf(|_, job| job.branch_id == 3 && job.reason == RetirementReason::BelowNewRange)
                    .return_once(|_, _| Ok(()));
                mock
            }))
            .build();

        let jobs = ProcessJob
            .run(
                &ctx.as_context(),
                "delete-branch",
                json!({
                    "repository_id": 1,
                    "installation_id": 2,
                    "branch_id": 3,
                    "reason": "below-new-range"
                }),
            )
            .await
            .unwrap();

        assert_eq!(jobs, vec![]);
    }
}
