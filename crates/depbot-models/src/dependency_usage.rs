use serde::{Deserialize, Serialize};

use crate::DependencyType;

/// One declaration of a dependency in a tracked repository manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyUsage {
    pub repository_id: u64,
    pub installation_id: u64,
    pub full_name: String,
    pub path: String,
    pub dependency: String,
    pub dependency_type: DependencyType,
    pub range: String,
}
