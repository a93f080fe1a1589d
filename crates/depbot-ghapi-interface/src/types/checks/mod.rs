mod check_conclusion;
mod check_run;
mod check_status;

pub use check_conclusion::GhCheckConclusion;
pub use check_run::{GhCheckRun, GhCheckRunList};
pub use check_status::GhCheckStatus;
