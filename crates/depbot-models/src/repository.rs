use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use time::OffsetDateTime;

use crate::{
    DependencyUsage, GroupConfigs, Manifests, RepositoryPath, RepositoryPathError,
};

/// Tracked repository.
#[derive(Debug, Clone, SmartDefault, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub id: u64,
    pub revision: u64,
    pub account_id: u64,
    pub installation_id: u64,
    pub full_name: String,
    #[default(true)]
    pub enabled: bool,
    pub private: bool,
    /// Manifest snapshot, by path.
    pub packages: Manifests,
    /// Dependency groups, by name.
    pub groups: GroupConfigs,
    pub last_processed_commit: Option<String>,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Repository {
    pub fn path(&self) -> Result<RepositoryPath, RepositoryPathError> {
        RepositoryPath::new(&self.full_name)
    }

    /// A repository with more than one manifest path.
    pub fn is_multi_manifest(&self) -> bool {
        self.packages.len() > 1
    }

    /// Name of the group owning a manifest path.
    pub fn group_of_path(&self, path: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, group)| group.owns_path(path))
            .map(|(name, _)| name.as_str())
    }

    /// Every declaration of the given dependencies, across manifests and buckets.
    pub fn usages_of(&self, dependencies: &[String]) -> Vec<DependencyUsage> {
        let mut usages = vec![];

        for (path, manifest) in &self.packages {
            for dependency in dependencies {
                for (dependency_type, range) in manifest.declarations(dependency) {
                    usages.push(DependencyUsage {
                        repository_id: self.id,
                        installation_id: self.installation_id,
                        full_name: self.full_name.clone(),
                        path: path.clone(),
                        dependency: dependency.clone(),
                        dependency_type,
                        range: range.into(),
                    });
                }
            }
        }

        usages
    }
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{DependencyType, GroupConfig, Manifest};

    #[test]
    fn usages_across_manifests() {
        let repository = Repository {
            id: 1,
            installation_id: 7,
            full_name: "me/app".into(),
            packages: btreemap! {
                "package.json".into() => Manifest::default()
                    .with_dependency(DependencyType::Dependencies, "lodash", "^4.0.0"),
                "api/package.json".into() => Manifest::default()
                    .with_dependency(DependencyType::DevDependencies, "lodash", "^3.0.0")
                    .with_dependency(DependencyType::Dependencies, "react", "^18.0.0"),
            },
            groups: btreemap! {
                "backend".into() => GroupConfig {
                    packages: vec!["api/package.json".into()],
                    ignore: vec![],
                }
            },
            ..Default::default()
        };

        assert!(repository.is_multi_manifest());
        assert_eq!(repository.group_of_path("api/package.json"), Some("backend"));
        assert_eq!(repository.group_of_path("package.json"), None);
        assert_eq!(
            repository.usages_of(&["lodash".into()]),
            vec![
                DependencyUsage {
                    repository_id: 1,
                    installation_id: 7,
                    full_name: "me/app".into(),
                    path: "api/package.json".into(),
                    dependency: "lodash".into(),
                    dependency_type: DependencyType::DevDependencies,
                    range: "^3.0.0".into(),
                },
                DependencyUsage {
                    repository_id: 1,
                    installation_id: 7,
                    full_name: "me/app".into(),
                    path: "package.json".into(),
                    dependency: "lodash".into(),
                    dependency_type: DependencyType::Dependencies,
                    range: "^4.0.0".into(),
                },
            ]
        );
    }
}
