pub(crate) mod build_update_jobs;
pub(crate) mod coordinate_monorepo_release;
pub(crate) mod handle_release_event;

pub use build_update_jobs::{BuildUpdateJobsInterface, ResolvedRelease};
pub use coordinate_monorepo_release::{CoordinateMonorepoReleaseInterface, MonorepoCoordination};
pub use handle_release_event::HandleReleaseEventInterface;

#[cfg(any(test, feature = "testkit"))]
pub use self::{
    build_update_jobs::MockBuildUpdateJobsInterface,
    coordinate_monorepo_release::MockCoordinateMonorepoReleaseInterface,
    handle_release_event::MockHandleReleaseEventInterface,
};
