use std::collections::BTreeMap;

/// Catalogue of packages released together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonorepoDefinitions {
    groups: BTreeMap<String, Vec<String>>,
}

impl MonorepoDefinitions {
    pub fn new(groups: BTreeMap<String, Vec<String>>) -> Self {
        Self { groups }
    }

    pub fn builtin() -> Self {
        let groups = [
            (
                "react",
                &["react", "react-dom", "react-test-renderer", "react-is"][..],
            ),
            (
                "angular",
                &[
                    "@angular/core",
                    "@angular/common",
                    "@angular/compiler",
                    "@angular/forms",
                    "@angular/router",
                    "@angular/platform-browser",
                ][..],
            ),
            (
                "vue",
                &["vue", "vue-template-compiler", "vue-server-renderer"][..],
            ),
            ("jest", &["jest", "jest-cli", "babel-jest"][..]),
            (
                "pouchdb",
                &["pouchdb", "pouchdb-core", "pouchdb-adapter-http", "pouchdb-find"][..],
            ),
        ];

        Self::new(
            groups
                .iter()
                .map(|(name, members)| {
                    (
                        name.to_string(),
                        members.iter().map(|m| m.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }

    /// Built-in catalogue, or the JSON `{group: [members]}` override when not empty.
    pub fn from_config(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            Ok(Self::builtin())
        } else {
            serde_json::from_str(raw).map(Self::new)
        }
    }

    /// Group containing a dependency, with its members.
    pub fn group_of(&self, dependency: &str) -> Option<(&str, &[String])> {
        self.groups
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == dependency))
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    pub fn members(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        let definitions = MonorepoDefinitions::builtin();
        let (group, members) = definitions.group_of("react-dom").unwrap();

        assert_eq!(group, "react");
        assert!(members.contains(&"react".to_string()));
        assert!(definitions.group_of("lodash").is_none());
    }

    #[test]
    fn override_from_config() {
        let definitions = MonorepoDefinitions::from_config(r#"{"ab": ["a", "b"]}"#).unwrap();

        assert_eq!(definitions.members("ab"), Some(&["a".to_string(), "b".to_string()][..]));
        assert!(definitions.group_of("react").is_none());
        assert!(MonorepoDefinitions::from_config("{").is_err());
    }
}
