pub(crate) mod process_job;

pub use process_job::{JobKind, ProcessJobInterface};

#[cfg(any(test, feature = "testkit"))]
pub use self::process_job::MockProcessJobInterface;
