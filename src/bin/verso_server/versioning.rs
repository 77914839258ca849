//! Version bookkeeping for one bucket. Pure; blobs and persistence are the
//! caller's business.
//!
//! Each key's list is kept most recent first, and at most one record per key
//! is latest: the first one.

use super::{BucketState, VersionRecord};

impl BucketState {
    pub(super) fn new(name: &str, creation_date: String) -> Self {
        Self {
            name: name.to_string(),
            creation_date,
            next_seq: 0,
            objects: Default::default(),
        }
    }

    pub(super) fn versions(&self, key: &str) -> &[VersionRecord] {
        self.objects.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The current record for `key`, which may be a delete marker.
    pub(super) fn latest(&self, key: &str) -> Option<&VersionRecord> {
        self.versions(key).iter().find(|v| v.is_latest)
    }

    pub(super) fn find(&self, key: &str, version_id: &str) -> Option<&VersionRecord> {
        self.versions(key).iter().find(|v| v.version_id == version_id)
    }

    /// Records a new object version and makes it latest.
    pub(super) fn put_version(
        &mut self,
        key: &str,
        version_id: String,
        size: u64,
        etag: String,
        now: String,
    ) -> VersionRecord {
        let rec = VersionRecord {
            version_id,
            seq: self.take_seq(),
            size,
            last_modified: now,
            is_latest: true,
            is_delete_marker: false,
            etag: Some(etag),
        };
        self.push_latest(key, rec.clone());
        rec
    }

    /// Hides `key` behind a new delete marker. Earlier versions stay.
    pub(super) fn put_delete_marker(
        &mut self,
        key: &str,
        version_id: String,
        now: String,
    ) -> VersionRecord {
        let rec = VersionRecord {
            version_id,
            seq: self.take_seq(),
            size: 0,
            last_modified: now,
            is_latest: true,
            is_delete_marker: true,
            etag: None,
        };
        self.push_latest(key, rec.clone());
        rec
    }

    /// Removes one version. If it was latest, the next most recent one takes
    /// over. Returns the removed record, or `None` if there was no such version.
    pub(super) fn remove_version(&mut self, key: &str, version_id: &str) -> Option<VersionRecord> {
        let list = self.objects.get_mut(key)?;
        let idx = list.iter().position(|v| v.version_id == version_id)?;
        let removed = list.remove(idx);
        if removed.is_latest
            && let Some(next) = list.first_mut()
        {
            next.is_latest = true;
        }
        if list.is_empty() {
            self.objects.remove(key);
        }
        Some(removed)
    }

    /// Makes `version_id` the current version of `key` by deleting every
    /// version created after it. Returns the deleted records, or `None` when
    /// the target is not in the history (nothing changes then).
    pub(super) fn rollback(&mut self, key: &str, version_id: &str) -> Option<Vec<VersionRecord>> {
        let list = self.objects.get_mut(key)?;
        let idx = list.iter().position(|v| v.version_id == version_id)?;
        let removed: Vec<VersionRecord> = list.drain(..idx).collect();
        for (i, v) in list.iter_mut().enumerate() {
            v.is_latest = i == 0;
        }
        Some(removed)
    }

    fn push_latest(&mut self, key: &str, rec: VersionRecord) {
        let list = self.objects.entry(key.to_string()).or_default();
        for v in list.iter_mut() {
            v.is_latest = false;
        }
        list.insert(0, rec);
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

#[cfg(test)]
#[path = "../../tests/bin/verso_server/versioning_tests.rs"]
mod tests;
