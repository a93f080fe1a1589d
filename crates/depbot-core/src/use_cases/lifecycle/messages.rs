//! Issue and comment bodies.

use depbot_models::{Branch, CombinedState};

pub(crate) fn failure_issue_title(branch: &Branch) -> String {
    format!(
        "An update of {} to {} is breaking the build",
        branch.issue_key(),
        branch.version
    )
}

pub(crate) fn failure_issue_body(branch: &Branch, pin_head: Option<&str>) -> String {
    let mut body = format!(
        "The {} `{}` was updated to `{}` in `{}`, and the build failed on branch `{}`.\n",
        branch.dependency_type, branch.dependency, branch.version, branch.path, branch.head
    );

    if let Some(old_version) = &branch.old_version {
        body.push_str(&format!(
            "\nThe previous requirement was `{}`.\n",
            old_version
        ));
    }

    if let Some(pin_head) = pin_head {
        body.push_str(&format!(
            "\nBranch `{}` pins the last working version. Its build tells whether this update broke the project.\n",
            pin_head
        ));
    }

    body
}

pub(crate) fn still_failing_comment(branch: &Branch) -> String {
    format!(
        "Version `{}` of `{}` was just published and the build is still failing.",
        branch.version, branch.dependency
    )
}

pub(crate) fn passing_again_comment(branch: &Branch) -> String {
    format!(
        "Version `{}` of `{}` was just published and the build is passing again.\n\nThis issue stays open until the new version is adopted.",
        branch.version, branch.dependency
    )
}

pub(crate) fn pin_outcome_comment(branch: &Branch, state: CombinedState) -> String {
    if state.is_success() {
        format!(
            "Pinning `{}` to `{}` restores a passing build on branch `{}`.",
            branch.dependency, branch.version, branch.head
        )
    } else {
        format!(
            "The build still fails with `{}` pinned to `{}`: the failure is probably not caused by the update.",
            branch.dependency, branch.version
        )
    }
}

pub(crate) fn pin_commit_message(branch: &Branch, version: &str) -> String {
    format!("fix(package): pin {} to {}", branch.dependency, version)
}

#[cfg(test)]
mod tests {
    use depbot_models::DependencyType;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn issue_title_uses_group_key() {
        let branch = Branch {
            dependency: "react".into(),
            group_name: Some("frontend".into()),
            version: "18.0.0".into(),
            ..Default::default()
        };

        assert_eq!(
            failure_issue_title(&branch),
            "An update of frontend to 18.0.0 is breaking the build"
        );
    }

    #[test]
    fn issue_body_mentions_old_requirement() {
        let branch = Branch {
            dependency: "react".into(),
            dependency_type: DependencyType::DevDependencies,
            version: "18.0.0".into(),
            old_version: Some("^17.0.0".into()),
            head: "depbot/react-18.0.0".into(),
            ..Default::default()
        };

        let body = failure_issue_body(&branch, None);
        assert!(body.starts_with("The devDependencies `react` was updated to `18.0.0`"));
        assert!(body.contains("`^17.0.0`"));
        assert!(!body.contains("pins"));
    }

    #[test]
    fn issue_body_names_pin_branch_when_pushed() {
        let branch = Branch {
            dependency: "react".into(),
            version: "18.0.0".into(),
            old_version: Some("^17.0.0".into()),
            ..Default::default()
        };

        let body = failure_issue_body(&branch, Some("depbot/pin/react-17.0.2"));
        assert!(body.contains("Branch `depbot/pin/react-17.0.2` pins the last working version."));
    }
}
