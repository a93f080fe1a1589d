use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CombinedStateError {
    /// Unknown combined state.
    #[error("Unknown combined state: {}", state)]
    UnknownCombinedState { state: String },
}

/// Reduction of every CI signal of a commit.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CombinedState {
    /// At least one signal is still running.
    #[default]
    Pending,
    /// Success.
    Success,
    /// Failure.
    Failure,
}

impl CombinedState {
    /// Convert combined state to static str.
    pub fn to_str(self) -> &'static str {
        self.into()
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl Display for CombinedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for CombinedState {
    type Err = CombinedStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl TryFrom<&str> for CombinedState {
    type Error = CombinedStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            e => Err(CombinedStateError::UnknownCombinedState {
                state: e.to_string(),
            }),
        }
    }
}

impl From<CombinedState> for &'static str {
    fn from(state: CombinedState) -> Self {
        match state {
            CombinedState::Pending => "pending",
            CombinedState::Success => "success",
            CombinedState::Failure => "failure",
        }
    }
}
