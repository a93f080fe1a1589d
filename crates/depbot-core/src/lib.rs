//! Dependency update orchestration.

#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

mod app;
mod context;
pub mod diff;
pub mod errors;
pub mod jobs;
pub mod semver_range;
pub mod use_cases;

pub use app::AppContext;
pub use context::CoreContext;
pub use errors::{DomainError, Result};
use shaku::module;
use use_cases::{
    branches::{
        delete_branch::DeleteBranch, handle_manifest_change::HandleManifestChange,
        plan_dependency_retirement::PlanDependencyRetirement,
        plan_group_retirement::PlanGroupRetirement,
    },
    checks::{aggregate_ci_signals::AggregateCiSignals, handle_ci_event::HandleCiEvent},
    jobs::process_job::ProcessJob,
    lifecycle::{
        create_pin_branch::CreatePinBranch, open_failure_issue::OpenFailureIssue,
        process_onboarding_outcome::ProcessOnboardingOutcome,
        process_pin_outcome::ProcessPinOutcome, process_update_outcome::ProcessUpdateOutcome,
    },
    releases::{
        build_update_jobs::BuildUpdateJobs,
        coordinate_monorepo_release::CoordinateMonorepoRelease,
        handle_release_event::HandleReleaseEvent,
    },
};

module! {
    pub CoreModule {
        components = [
            BuildUpdateJobs, CoordinateMonorepoRelease, HandleReleaseEvent,
            PlanDependencyRetirement, PlanGroupRetirement, DeleteBranch,
            HandleManifestChange, AggregateCiSignals, HandleCiEvent,
            ProcessUpdateOutcome, OpenFailureIssue, CreatePinBranch,
            ProcessPinOutcome, ProcessOnboardingOutcome, ProcessJob
        ],
        providers = []
    }
}
