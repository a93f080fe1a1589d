use std::collections::BTreeSet;

use depbot_models::GroupConfigs;

/// Group names which appeared, disappeared or changed their package list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDiff {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub modified: BTreeSet<String>,
}

impl GroupDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Compare two group configurations.
///
/// Only the package lists are compared, `ignore` changes do not count.
pub fn diff_groups(old: &GroupConfigs, new: &GroupConfigs) -> GroupDiff {
    let mut diff = GroupDiff::default();

    for (name, old_group) in old {
        match new.get(name) {
            None => {
                diff.removed.insert(name.clone());
            }
            Some(new_group) if !old_group.same_packages(new_group) => {
                diff.modified.insert(name.clone());
            }
            Some(_) => (),
        }
    }

    for name in new.keys() {
        if !old.contains_key(name) {
            diff.added.insert(name.clone());
        }
    }

    diff
}
