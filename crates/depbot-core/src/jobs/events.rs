use std::collections::BTreeMap;

use depbot_models::Manifests;
use serde::{Deserialize, Serialize};

/// Dist-tag advancement of a package, from a registry sync or hook.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReleaseEvent {
    pub dependency: String,
    pub dist_tags: BTreeMap<String, String>,
    #[serde(default)]
    pub versions: BTreeMap<String, serde_json::Value>,
    /// Release a monorepo group without waiting for every member.
    #[serde(default)]
    pub force: bool,
}

/// Status or check-run delivery for a commit.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CiEvent {
    pub repository_id: u64,
    pub installation_id: u64,
    pub sha: String,
}

/// Push on the default branch touching manifests or the group configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ManifestChangeEvent {
    pub repository_id: u64,
    pub installation_id: u64,
    /// Pushed commit.
    pub after: String,
    pub packages: Manifests,
    /// Raw group configuration; `null` when the configuration was removed.
    #[serde(default)]
    pub groups: serde_json::Value,
}
