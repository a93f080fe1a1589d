mod messages;
pub(crate) mod create_pin_branch;
pub(crate) mod open_failure_issue;
pub(crate) mod process_onboarding_outcome;
pub(crate) mod process_pin_outcome;
pub(crate) mod process_update_outcome;

pub use create_pin_branch::CreatePinBranchInterface;
pub use open_failure_issue::OpenFailureIssueInterface;
pub use process_onboarding_outcome::ProcessOnboardingOutcomeInterface;
pub use process_pin_outcome::ProcessPinOutcomeInterface;
pub use process_update_outcome::{ProcessUpdateOutcomeInterface, UpdateOutcome};

#[cfg(any(test, feature = "testkit"))]
pub use self::{
    create_pin_branch::MockCreatePinBranchInterface,
    open_failure_issue::MockOpenFailureIssueInterface,
    process_onboarding_outcome::MockProcessOnboardingOutcomeInterface,
    process_pin_outcome::MockProcessPinOutcomeInterface,
    process_update_outcome::MockProcessUpdateOutcomeInterface,
};
