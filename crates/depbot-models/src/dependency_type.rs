use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DependencyTypeError {
    /// Unknown dependency type.
    #[error("Unknown dependency type: {}", dependency_type)]
    UnknownDependencyType { dependency_type: String },
}

/// Manifest dependency bucket.
///
/// Variants are ordered by job priority.
#[derive(
    Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Default,
)]
pub enum DependencyType {
    /// dependencies.
    #[default]
    #[serde(rename = "dependencies")]
    Dependencies,
    /// devDependencies.
    #[serde(rename = "devDependencies")]
    DevDependencies,
    /// optionalDependencies.
    #[serde(rename = "optionalDependencies")]
    OptionalDependencies,
    /// peerDependencies.
    #[serde(rename = "peerDependencies")]
    PeerDependencies,
}

impl DependencyType {
    /// Every bucket, in priority order.
    pub const ALL: [DependencyType; 4] = [
        Self::Dependencies,
        Self::DevDependencies,
        Self::OptionalDependencies,
        Self::PeerDependencies,
    ];

    /// Convert dependency type to static str.
    pub fn to_str(self) -> &'static str {
        self.into()
    }

    /// Job priority, lower wins.
    pub fn priority(self) -> u8 {
        match self {
            Self::Dependencies => 0,
            Self::DevDependencies => 1,
            Self::OptionalDependencies => 2,
            Self::PeerDependencies => 3,
        }
    }

    /// Peer dependencies never produce update jobs.
    pub fn produces_jobs(self) -> bool {
        self != Self::PeerDependencies
    }
}

impl Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for DependencyType {
    type Err = DependencyTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl TryFrom<&str> for DependencyType {
    type Error = DependencyTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "dependencies" => Ok(Self::Dependencies),
            "devDependencies" => Ok(Self::DevDependencies),
            "optionalDependencies" => Ok(Self::OptionalDependencies),
            "peerDependencies" => Ok(Self::PeerDependencies),
            e => Err(DependencyTypeError::UnknownDependencyType {
                dependency_type: e.to_string(),
            }),
        }
    }
}

impl From<DependencyType> for &'static str {
    fn from(dependency_type: DependencyType) -> Self {
        match dependency_type {
            DependencyType::Dependencies => "dependencies",
            DependencyType::DevDependencies => "devDependencies",
            DependencyType::OptionalDependencies => "optionalDependencies",
            DependencyType::PeerDependencies => "peerDependencies",
        }
    }
}
