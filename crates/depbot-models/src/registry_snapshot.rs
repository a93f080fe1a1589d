use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use time::OffsetDateTime;

/// Last observed dist-tags of a package.
#[derive(Debug, Clone, SmartDefault, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub id: u64,
    pub revision: u64,
    pub name: String,
    pub dist_tags: BTreeMap<String, String>,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[default(OffsetDateTime::UNIX_EPOCH)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
