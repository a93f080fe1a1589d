use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Named dependency groups of a repository.
pub type GroupConfigs = BTreeMap<String, GroupConfig>;

/// One dependency group: the manifest paths it owns and the dependencies it skips.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    pub packages: Vec<String>,
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl GroupConfig {
    pub fn owns_path(&self, path: &str) -> bool {
        self.packages.iter().any(|p| p == path)
    }

    pub fn ignores(&self, dependency: &str) -> bool {
        self.ignore.iter().any(|d| d == dependency)
    }

    /// Order-insensitive comparison of the package lists.
    pub fn same_packages(&self, other: &GroupConfig) -> bool {
        let left: BTreeSet<&str> = self.packages.iter().map(String::as_str).collect();
        let right: BTreeSet<&str> = other.packages.iter().map(String::as_str).collect();
        left == right
    }
}
