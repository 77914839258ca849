//! JSON endpoints under `/api`, all behind `require_token`.

use super::*;

#[derive(Debug, serde::Serialize)]
pub(super) struct BucketView {
    name: String,
    creation_date: String,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct VersionView {
    version_id: String,
    size: u64,
    last_modified: String,
    is_latest: bool,
    is_delete_marker: bool,
    etag: Option<String>,
}

impl From<&VersionRecord> for VersionView {
    fn from(v: &VersionRecord) -> Self {
        Self {
            version_id: v.version_id.clone(),
            size: v.size,
            last_modified: v.last_modified.clone(),
            is_latest: v.is_latest,
            is_delete_marker: v.is_delete_marker,
            etag: v.etag.clone(),
        }
    }
}

pub(super) async fn list_buckets(State(state): State<Arc<AppState>>) -> Json<Vec<BucketView>> {
    let buckets = state.buckets.read().await;
    let mut out: Vec<BucketView> = buckets
        .values()
        .map(|b| BucketView {
            name: b.name.clone(),
            creation_date: b.creation_date.clone(),
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Json(out)
}

pub(super) async fn list_objects(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
) -> Result<Json<BTreeMap<String, Vec<VersionView>>>, Response> {
    let buckets = state.buckets.read().await;
    let Some(b) = buckets.get(&bucket) else {
        return Err(not_found("no such bucket"));
    };
    let out = b
        .objects
        .iter()
        .map(|(key, versions)| (key.clone(), versions.iter().map(VersionView::from).collect()))
        .collect();
    Ok(Json(out))
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct RollbackQuery {
    key: String,
    version_id: String,
}

pub(super) async fn rollback(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
    Query(q): Query<RollbackQuery>,
) -> Result<Json<serde_json::Value>, Response> {
    let mut buckets = state.buckets.write().await;
    let Some(b) = buckets.get_mut(&bucket) else {
        return Err(not_found("no such bucket"));
    };
    let mut next = b.clone();
    let Some(removed) = next.rollback(&q.key, &q.version_id) else {
        return Err(not_found("target version not found in history"));
    };

    commit_bucket(&state, b, next).map_err(internal_error)?;
    remove_blobs(&state, &bucket, &q.key, &removed);

    tracing::info!(
        bucket = %bucket,
        key = %q.key,
        version_id = %q.version_id,
        removed = removed.len(),
        "rolled back"
    );
    Ok(Json(serde_json::json!({
        "status": "success",
        "message": format!("Rolled back to {}, {} newer version(s) deleted.", q.version_id, removed.len()),
    })))
}
