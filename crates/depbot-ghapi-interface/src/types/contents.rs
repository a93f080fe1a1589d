use serde::{Deserialize, Serialize};

/// File at a reference, decoded.
#[derive(Debug, Deserialize, Serialize, Default, PartialEq, Eq, Clone)]
pub struct GhFileContent {
    /// Path.
    pub path: String,
    /// Blob SHA, required to update the file.
    pub sha: String,
    /// UTF-8 content.
    pub content: String,
}
