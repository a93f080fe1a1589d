//! Emitted jobs and inbound events.

mod events;
mod job;

pub use events::{CiEvent, ManifestChangeEvent, ReleaseEvent};
pub use job::{
    CommentOnInitialPrJob, DeleteBranchJob, InitialPrJob, InvalidGroupConfigJob, Job,
    MonorepoReleaseTimeoutJob, RetirementReason, VersionBranchJob,
};
