use super::*;

pub(super) fn buckets_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("buckets")
}

pub(super) fn bucket_dir(state: &AppState, bucket: &str) -> PathBuf {
    buckets_dir(&state.data_dir).join(bucket)
}

pub(super) fn bucket_index_path(state: &AppState, bucket: &str) -> PathBuf {
    bucket_dir(state, bucket).join("index.json")
}

/// `blobs/{blake3(key)}/{version_id}`; hashing keeps arbitrary keys off the filesystem.
pub(super) fn blob_path(state: &AppState, bucket: &str, key: &str, version_id: &str) -> PathBuf {
    bucket_dir(state, bucket)
        .join("blobs")
        .join(blake3::hash(key.as_bytes()).to_hex().as_str())
        .join(version_id)
}

pub(super) fn persist_bucket(state: &AppState, bucket: &BucketState) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(bucket).context("serialize bucket index")?;
    let path = bucket_index_path(state, &bucket.name);
    write_atomic_overwrite(&path, &bytes).context("write index.json")?;
    Ok(())
}

/// Persists `next` and only then installs it in `slot`. On error `slot` is
/// left exactly as it was.
pub(super) fn commit_bucket(
    state: &AppState,
    slot: &mut BucketState,
    next: BucketState,
) -> Result<()> {
    persist_bucket(state, &next)?;
    *slot = next;
    Ok(())
}

pub(super) fn write_blob(
    state: &AppState,
    bucket: &str,
    key: &str,
    version_id: &str,
    bytes: &[u8],
) -> Result<()> {
    let path = blob_path(state, bucket, key, version_id);
    write_atomic_overwrite(&path, bytes).context("write blob")
}

pub(super) fn read_blob(
    state: &AppState,
    bucket: &str,
    key: &str,
    version_id: &str,
) -> Result<Vec<u8>> {
    let path = blob_path(state, bucket, key, version_id);
    std::fs::read(&path).with_context(|| format!("read blob {}", path.display()))
}

/// Removes the blobs behind `records`. Delete markers have none.
pub(super) fn remove_blobs(state: &AppState, bucket: &str, key: &str, records: &[VersionRecord]) {
    for rec in records.iter().filter(|r| !r.is_delete_marker) {
        let path = blob_path(state, bucket, key, &rec.version_id);
        if let Err(err) = std::fs::remove_file(&path)
            && err.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %path.display(), "remove blob: {}", err);
        }
    }
}

pub(super) fn load_buckets_from_disk(data_dir: &std::path::Path) -> Result<HashMap<String, BucketState>> {
    let mut out = HashMap::new();
    let root = buckets_dir(data_dir);
    if !root.is_dir() {
        return Ok(out);
    }

    for entry in std::fs::read_dir(&root).context("read buckets dir")? {
        let entry = entry.context("read buckets dir entry")?;
        let path = entry.path().join("index.json");
        if !path.is_file() {
            continue;
        }
        let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let mut bucket: BucketState = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", path.display()))?;
        for versions in bucket.objects.values_mut() {
            versions.sort_by(|a, b| b.seq.cmp(&a.seq));
        }
        out.insert(bucket.name.clone(), bucket);
    }

    Ok(out)
}

pub(super) fn write_atomic_overwrite(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    std::fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
