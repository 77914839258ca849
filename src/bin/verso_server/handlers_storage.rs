//! Raw S3-style storage paths. Reads are public so plain download links
//! work; writes go through `require_token`.

use super::*;

const VERSION_ID_HEADER: &str = "x-amz-version-id";
const DELETE_MARKER_HEADER: &str = "x-amz-delete-marker";

#[derive(Debug, Default, serde::Deserialize)]
pub(super) struct VersionQuery {
    #[serde(rename = "versionId")]
    version_id: Option<String>,
}

fn header_value(s: &str) -> Result<HeaderValue, Response> {
    HeaderValue::from_str(s).map_err(|e| internal_error(anyhow::anyhow!(e)))
}

pub(super) async fn create_bucket(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
) -> Result<StatusCode, Response> {
    validate_bucket_name(&bucket).map_err(bad_request)?;

    let mut buckets = state.buckets.write().await;
    if buckets.contains_key(&bucket) {
        return Err(conflict("bucket already exists"));
    }
    let b = BucketState::new(&bucket, now_ts());
    persist_bucket(&state, &b).map_err(internal_error)?;
    buckets.insert(bucket.clone(), b);

    tracing::info!(bucket = %bucket, "created bucket");
    Ok(StatusCode::OK)
}

pub(super) async fn list_bucket(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
    Query(q): Query<HashMap<String, String>>,
) -> Result<Response, Response> {
    let buckets = state.buckets.read().await;
    let Some(b) = buckets.get(&bucket) else {
        return Err(not_found("no such bucket"));
    };
    let body = if q.contains_key("versions") {
        list_versions_result(b, &state.user)
    } else {
        list_bucket_result(b, &state.user)
    };
    Ok(([(header::CONTENT_TYPE, "application/xml")], body).into_response())
}

pub(super) async fn put_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
    body: axum::body::Bytes,
) -> Result<Response, Response> {
    validate_object_key(&key).map_err(bad_request)?;

    let mut buckets = state.buckets.write().await;
    let Some(b) = buckets.get_mut(&bucket) else {
        return Err(not_found("no such bucket"));
    };

    let version_id = random_hex(16).map_err(internal_error)?;
    let etag = format!("\"{}\"", blake3::hash(&body).to_hex());
    write_blob(&state, &bucket, &key, &version_id, &body).map_err(internal_error)?;
    let mut next = b.clone();
    let rec = next.put_version(&key, version_id, body.len() as u64, etag, now_ts());
    if let Err(err) = commit_bucket(&state, b, next) {
        remove_blobs(&state, &bucket, &key, std::slice::from_ref(&rec));
        return Err(internal_error(err));
    }

    tracing::info!(bucket = %bucket, key = %key, version_id = %rec.version_id, size = rec.size, "stored object");

    let mut resp = StatusCode::OK.into_response();
    let headers = resp.headers_mut();
    headers.insert(VERSION_ID_HEADER, header_value(&rec.version_id)?);
    if let Some(etag) = &rec.etag {
        headers.insert(header::ETAG, header_value(etag)?);
    }
    Ok(resp)
}

pub(super) async fn get_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
    Query(q): Query<VersionQuery>,
) -> Result<Response, Response> {
    let rec = {
        let buckets = state.buckets.read().await;
        let Some(b) = buckets.get(&bucket) else {
            return Err(not_found("no such bucket"));
        };
        let found = match q.version_id.as_deref() {
            Some(v) => b.find(&key, v),
            None => b.latest(&key),
        };
        match found {
            Some(rec) if !rec.is_delete_marker => rec.clone(),
            _ => return Err(not_found("no such key")),
        }
    };

    let bytes = read_blob(&state, &bucket, &key, &rec.version_id).map_err(internal_error)?;

    let mut resp = bytes.into_response();
    let headers = resp.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(VERSION_ID_HEADER, header_value(&rec.version_id)?);
    if let Some(etag) = &rec.etag {
        headers.insert(header::ETAG, header_value(etag)?);
    }
    Ok(resp)
}

pub(super) async fn delete_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
    Query(q): Query<VersionQuery>,
) -> Result<Response, Response> {
    let mut buckets = state.buckets.write().await;

    let Some(version_id) = q.version_id else {
        let Some(b) = buckets.get_mut(&bucket) else {
            return Err(not_found("no such bucket"));
        };
        let marker_id = random_hex(16).map_err(internal_error)?;
        let mut next = b.clone();
        let rec = next.put_delete_marker(&key, marker_id, now_ts());
        commit_bucket(&state, b, next).map_err(internal_error)?;
        tracing::info!(bucket = %bucket, key = %key, version_id = %rec.version_id, "inserted delete marker");

        let mut resp = StatusCode::NO_CONTENT.into_response();
        let headers = resp.headers_mut();
        headers.insert(VERSION_ID_HEADER, header_value(&rec.version_id)?);
        headers.insert(DELETE_MARKER_HEADER, HeaderValue::from_static("true"));
        return Ok(resp);
    };

    // Deleting a version that does not exist succeeds, as S3 does.
    let Some(b) = buckets.get_mut(&bucket) else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };
    let mut next = b.clone();
    if let Some(removed) = next.remove_version(&key, &version_id) {
        commit_bucket(&state, b, next).map_err(internal_error)?;
        remove_blobs(&state, &bucket, &key, std::slice::from_ref(&removed));
        tracing::info!(bucket = %bucket, key = %key, version_id = %version_id, "deleted version");
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}
