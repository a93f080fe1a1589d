use std::collections::{hash_map::Entry, HashMap};

use async_trait::async_trait;
use depbot_ghapi_interface::{
    types::{GhCheckRun, GhCheckStatus, GhCommitStatusItem},
    ApiError,
};
use depbot_models::{CombinedState, RepositoryPath};
use shaku::{Component, Interface};
use tracing::debug;

use crate::{CoreContext, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSource {
    Status,
    CheckRun,
}

/// One entry of the unified signal list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiSignal {
    pub source: SignalSource,
    /// Status context, or check run name.
    pub context: String,
    /// Status state, check conclusion, or `pending`.
    pub state: String,
}

/// Concluded outcome of a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedSignals {
    pub state: CombinedState,
    pub signals: Vec<CiSignal>,
}

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait AggregateCiSignalsInterface: Interface {
    /// `None` while the outcome is not known yet.
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        installation_id: u64,
        repository_path: &RepositoryPath,
        commit_sha: &str,
    ) -> Result<Option<AggregatedSignals>>;
}

#[derive(Component)]
#[shaku(interface = AggregateCiSignalsInterface)]
pub(crate) struct AggregateCiSignals;

#[async_trait]
impl AggregateCiSignalsInterface for AggregateCiSignals {
    #[tracing::instrument(skip(self, ctx), fields(repository_path = %repository_path), ret)]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        installation_id: u64,
        repository_path: &RepositoryPath,
        commit_sha: &str,
    ) -> Result<Option<AggregatedSignals>> {
        let statuses = filter_statuses(
            &ctx.api_service
                .commit_statuses_list(
                    installation_id,
                    repository_path.owner(),
                    repository_path.name(),
                    commit_sha,
                )
                .await?,
        );

        if statuses
            .iter()
            .any(|s| s.state.is_pending())
        {
            return Ok(None);
        }

        let mut state = merge_statuses(&statuses);
        let mut signals: Vec<CiSignal> = statuses
            .iter()
            .map(|s| CiSignal {
                source: SignalSource::Status,
                context: s.context.clone(),
                state: s.state.to_str().into(),
            })
            .collect();

        let check_runs = match ctx
            .api_service
            .check_runs_list(
                installation_id,
                repository_path.owner(),
                repository_path.name(),
                commit_sha,
            )
            .await
        {
            Ok(list) => Some(list),
            Err(e @ (ApiError::Forbidden { .. } | ApiError::NotFound { .. })) => {
                debug!(
                    error = %e,
                    message = "Check runs unavailable, using statuses only"
                );
                None
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(list) = check_runs {
            signals.extend(list.check_runs.iter().map(check_run_signal));

            let completed = list
                .check_runs
                .iter()
                .filter(|r| r.status.is_completed())
                .count() as u64;
            if completed < list.total_count {
                return Ok(None);
            }

            if let Some(check_state) = merge_check_runs(&list.check_runs) {
                state = Some(check_state);
            }
        }

        Ok(state.map(|state| AggregatedSignals { state, signals }))
    }
}

/// Keep the last status of each context.
fn filter_statuses(statuses: &[GhCommitStatusItem]) -> Vec<GhCommitStatusItem> {
    let mut map: HashMap<String, GhCommitStatusItem> = HashMap::new();
    for item in statuses {
        match map.entry(item.context.clone()) {
            Entry::Vacant(e) => {
                e.insert(item.clone());
            }
            Entry::Occupied(mut e) => {
                if e.get().updated_at < item.updated_at {
                    e.insert(item.clone());
                }
            }
        }
    }

    let mut filtered: Vec<_> = map.into_values().collect();
    filtered.sort_by(|a, b| a.context.cmp(&b.context));
    filtered
}

fn merge_statuses(statuses: &[GhCommitStatusItem]) -> Option<CombinedState> {
    if statuses.is_empty() {
        None
    } else if statuses.iter().any(|s| s.state.is_failing()) {
        Some(CombinedState::Failure)
    } else {
        Some(CombinedState::Success)
    }
}

fn merge_check_runs(check_runs: &[GhCheckRun]) -> Option<CombinedState> {
    if check_runs.is_empty() {
        None
    } else if check_runs
        .iter()
        .any(|r| r.conclusion.map_or(false, |c| c.is_failing()))
    {
        Some(CombinedState::Failure)
    } else {
        Some(CombinedState::Success)
    }
}

fn check_run_signal(check_run: &GhCheckRun) -> CiSignal {
    let state = match (check_run.status, check_run.conclusion) {
        (GhCheckStatus::Completed, Some(conclusion)) => conclusion.to_str(),
        (GhCheckStatus::Completed, None) => "neutral",
        _ => "pending",
    };

    CiSignal {
        source: SignalSource::CheckRun,
        context: check_run.name.clone(),
        state: state.into(),
    }
}
