//! Manifest and group configuration diffs.

mod dependency_diff;
mod group_diff;

pub use dependency_diff::{diff_manifests, DependencyChange, DependencyDiff};
pub use group_diff::{diff_groups, GroupDiff};
