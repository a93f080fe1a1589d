use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::DependencyType;

/// Manifests of a repository, by path.
pub type Manifests = BTreeMap<String, Manifest>;

/// Dependency buckets of a `package.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub optional_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub peer_dependencies: BTreeMap<String, String>,
}

impl Manifest {
    pub fn bucket(&self, dependency_type: DependencyType) -> &BTreeMap<String, String> {
        match dependency_type {
            DependencyType::Dependencies => &self.dependencies,
            DependencyType::DevDependencies => &self.dev_dependencies,
            DependencyType::OptionalDependencies => &self.optional_dependencies,
            DependencyType::PeerDependencies => &self.peer_dependencies,
        }
    }

    pub fn bucket_mut(
        &mut self,
        dependency_type: DependencyType,
    ) -> &mut BTreeMap<String, String> {
        match dependency_type {
            DependencyType::Dependencies => &mut self.dependencies,
            DependencyType::DevDependencies => &mut self.dev_dependencies,
            DependencyType::OptionalDependencies => &mut self.optional_dependencies,
            DependencyType::PeerDependencies => &mut self.peer_dependencies,
        }
    }

    /// Requirement declared for a dependency in a bucket.
    pub fn requirement(&self, dependency_type: DependencyType, dependency: &str) -> Option<&str> {
        self.bucket(dependency_type)
            .get(dependency)
            .map(String::as_str)
    }

    /// Every bucket declaring the dependency, in priority order.
    pub fn declarations<'a>(
        &'a self,
        dependency: &'a str,
    ) -> impl Iterator<Item = (DependencyType, &'a str)> + 'a {
        DependencyType::ALL
            .into_iter()
            .filter_map(move |t| self.requirement(t, dependency).map(|r| (t, r)))
    }

    pub fn with_dependency(
        mut self,
        dependency_type: DependencyType,
        dependency: &str,
        requirement: &str,
    ) -> Self {
        self.bucket_mut(dependency_type)
            .insert(dependency.into(), requirement.into());
        self
    }
}
