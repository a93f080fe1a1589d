use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use time::OffsetDateTime;

use super::{GhCheckConclusion, GhCheckStatus};

/// GitHub Check run.
#[derive(Debug, Deserialize, Serialize, SmartDefault, PartialEq, Eq, Clone)]
pub struct GhCheckRun {
    /// ID.
    pub id: u64,
    /// Name
    pub name: String,
    /// Head commit SHA.
    pub head_sha: String,
    /// Status.
    pub status: GhCheckStatus,
    /// Conclusion.
    pub conclusion: Option<GhCheckConclusion>,
    /// Created at.
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    /// Updated at.
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

/// Check runs of a reference.
#[derive(Debug, Deserialize, Serialize, Default, PartialEq, Eq, Clone)]
pub struct GhCheckRunList {
    /// Total count, across pages.
    pub total_count: u64,
    /// Check runs.
    pub check_runs: Vec<GhCheckRun>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize() {
        let list: GhCheckRunList = serde_json::from_str(
            r#"{
                "total_count": 2,
                "check_runs": [
                    {
                        "id": 1,
                        "name": "lint",
                        "head_sha": "abcdef",
                        "status": "completed",
                        "conclusion": "timed_out",
                        "started_at": "2024-01-01T10:00:00Z",
                        "completed_at": "2024-01-01T10:05:00Z"
                    },
                    {
                        "id": 2,
                        "name": "test",
                        "head_sha": "abcdef",
                        "status": "in_progress",
                        "conclusion": null,
                        "started_at": "2024-01-01T10:00:00Z",
                        "completed_at": null
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(list.total_count, 2);
        assert_eq!(list.check_runs[0].conclusion, Some(GhCheckConclusion::TimedOut));
        assert_eq!(list.check_runs[1].status, GhCheckStatus::InProgress);
    }
}
