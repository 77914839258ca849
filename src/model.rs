use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-key version history for one bucket, each list ordered most-recent first.
pub type VersionMap = HashMap<String, Vec<ObjectVersion>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,

    #[serde(default)]
    pub creation_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectVersion {
    // The wire format groups versions under their key, so the key is filled in
    // after decoding.
    #[serde(default)]
    pub key: String,

    pub version_id: String,

    #[serde(default)]
    pub size: u64,

    pub last_modified: String,
    pub is_latest: bool,
    pub is_delete_marker: bool,

    #[serde(default)]
    pub etag: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub version: u32,

    #[serde(default)]
    pub base_url: Option<String>,

    /// Last username that signed in, offered as the default on the login form.
    #[serde(default)]
    pub username: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            version: 1,
            base_url: None,
            username: None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    pub version: u32,

    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Decodes the `{key: [version, ...]}` payload and stamps each record with its key.
pub fn version_map_from_wire(raw: HashMap<String, Vec<ObjectVersion>>) -> VersionMap {
    raw.into_iter()
        .map(|(key, mut versions)| {
            for v in &mut versions {
                v.key = key.clone();
            }
            (key, versions)
        })
        .collect()
}
