use super::*;

pub(super) fn app_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let authed = Router::new()
        .route("/api/buckets", get(list_buckets))
        .route("/api/:bucket/objects", get(list_objects))
        .route("/api/:bucket/rollback", post(rollback))
        .route("/:bucket", put(create_bucket))
        .route("/:bucket/*key", put(put_object).delete(delete_object))
        .layer(middleware::from_fn_with_state(state.clone(), require_token));

    let public = Router::new()
        .route("/healthz", get(healthz))
        .route("/login", post(login))
        .route("/:bucket", get(list_bucket))
        .route("/:bucket/*key", get(get_object));

    public
        .merge(authed)
        .layer(axum::extract::DefaultBodyLimit::max(max_upload_bytes))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
