use std::collections::BTreeMap;

use depbot_models::{DependencyType, Manifest};

/// Change of one dependency declaration between two manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyChange {
    Added { after: String },
    Removed { before: String },
    Modified { before: String, after: String },
}

impl DependencyChange {
    /// Requirement declared after the change, if any.
    pub fn after(&self) -> Option<&str> {
        match self {
            Self::Added { after } | Self::Modified { after, .. } => Some(after),
            Self::Removed { .. } => None,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }
}

/// Changes of a manifest, keyed by bucket then dependency name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyDiff {
    /// Group owning the manifest path.
    pub group_name: Option<String>,
    pub entries: BTreeMap<(DependencyType, String), DependencyChange>,
}

impl DependencyDiff {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DependencyType, &str, &DependencyChange)> {
        self.entries
            .iter()
            .map(|((t, dependency), change)| (*t, dependency.as_str(), change))
    }
}

/// Compute the dependency changes between two versions of a manifest.
///
/// A missing manifest is treated as empty.
pub fn diff_manifests(
    old: Option<&Manifest>,
    new: Option<&Manifest>,
    group_name: Option<&str>,
) -> DependencyDiff {
    let empty = Manifest::default();
    let old = old.unwrap_or(&empty);
    let new = new.unwrap_or(&empty);

    let mut entries = BTreeMap::new();
    for dependency_type in DependencyType::ALL {
        let before = old.bucket(dependency_type);
        let after = new.bucket(dependency_type);

        for (name, requirement) in before {
            match after.get(name) {
                None => {
                    entries.insert(
                        (dependency_type, name.clone()),
                        DependencyChange::Removed {
                            before: requirement.clone(),
                        },
                    );
                }
                Some(new_requirement) if new_requirement != requirement => {
                    entries.insert(
                        (dependency_type, name.clone()),
                        DependencyChange::Modified {
                            before: requirement.clone(),
                            after: new_requirement.clone(),
                        },
                    );
                }
                Some(_) => (),
            }
        }

        for (name, requirement) in after {
            if !before.contains_key(name) {
                entries.insert(
                    (dependency_type, name.clone()),
                    DependencyChange::Added {
                        after: requirement.clone(),
                    },
                );
            }
        }
    }

    DependencyDiff {
        group_name: group_name.map(Into::into),
        entries,
    }
}
