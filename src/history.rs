use std::collections::HashMap;

use crate::api::{ApiClient, ApiError, Route};
use crate::model::{ObjectVersion, VersionMap, version_map_from_wire};

/// Version records for the selected bucket. Always replaced as a whole.
#[derive(Debug, Default)]
pub struct VersionHistoryStore {
    bucket: Option<String>,
    versions: VersionMap,
}

impl VersionHistoryStore {
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn versions(&self) -> &VersionMap {
        &self.versions
    }

    pub fn get(&self, key: &str) -> Option<&[ObjectVersion]> {
        self.versions.get(key).map(Vec::as_slice)
    }

    /// Replaces the map with `bucket`'s full history.
    ///
    /// On failure the previous map is kept unless the session ended, in which
    /// case it is discarded along with the session.
    pub fn load(&mut self, api: &mut ApiClient, bucket: &str) -> Result<(), ApiError> {
        let raw: HashMap<String, Vec<ObjectVersion>> = match api.get_json(&Route::objects(bucket))
        {
            Ok(raw) => raw,
            Err(ApiError::SessionEnded) => {
                self.clear();
                return Err(ApiError::SessionEnded);
            }
            Err(err) => return Err(err),
        };

        let versions = version_map_from_wire(raw);
        for key in latest_violations(&versions) {
            tracing::warn!(bucket, key = %key, "history does not have exactly one latest version");
        }
        tracing::debug!(bucket, keys = versions.len(), "loaded version history");

        self.bucket = Some(bucket.to_string());
        self.versions = versions;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.bucket = None;
        self.versions.clear();
    }
}

/// Keys whose history does not have exactly one latest record, or whose
/// latest record is not the most recent one.
pub fn latest_violations(versions: &VersionMap) -> Vec<String> {
    let mut out: Vec<String> = versions
        .iter()
        .filter(|(_, list)| {
            let latest = list.iter().filter(|v| v.is_latest).count();
            latest != 1 || !list.first().is_some_and(|v| v.is_latest)
        })
        .map(|(k, _)| k.clone())
        .collect();
    out.sort();
    out
}

#[cfg(test)]
#[path = "tests/history_tests.rs"]
mod tests;
