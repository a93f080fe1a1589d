mod checks;
mod contents;
mod issues;
mod pulls;
mod statuses;

pub use checks::{GhCheckConclusion, GhCheckRun, GhCheckRunList, GhCheckStatus};
pub use contents::GhFileContent;
pub use issues::{GhIssue, GhIssueState};
pub use pulls::GhPullRequest;
pub use statuses::{GhCommitStatusItem, GhCommitStatusState};
