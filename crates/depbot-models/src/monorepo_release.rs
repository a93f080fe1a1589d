use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use time::OffsetDateTime;

/// Members of a monorepo group seen releasing the same version.
#[derive(Debug, Clone, SmartDefault, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonorepoRelease {
    pub id: u64,
    pub revision: u64,
    pub group: String,
    pub version: String,
    pub members: BTreeSet<String>,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl MonorepoRelease {
    pub fn is_complete(&self, expected: &[String]) -> bool {
        expected.iter().all(|m| self.members.contains(m))
    }
}
