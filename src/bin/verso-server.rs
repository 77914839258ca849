#![allow(clippy::result_large_err)]

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router, extract::Path};
use tokio::sync::RwLock;

#[path = "verso_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "verso_server/validators.rs"]
mod validators;
use self::validators::*;
#[path = "verso_server/sessions.rs"]
mod sessions;
use self::sessions::*;
#[path = "verso_server/persistence.rs"]
mod persistence;
use self::persistence::*;
#[path = "verso_server/versioning.rs"]
mod versioning;
#[path = "verso_server/xml.rs"]
mod xml;
use self::xml::*;
#[path = "verso_server/handlers_api.rs"]
mod handlers_api;
use self::handlers_api::*;
#[path = "verso_server/handlers_storage.rs"]
mod handlers_storage;
use self::handlers_storage::*;
#[path = "verso_server/routes.rs"]
mod routes;
use self::routes::*;
#[path = "verso_server/runtime.rs"]
mod runtime;

#[derive(Clone)]
struct AppState {
    data_dir: PathBuf,

    user: String,
    // blake3 of the configured password; compared hashed like tokens.
    password_hash: String,

    token_ttl: time::Duration,

    buckets: Arc<RwLock<HashMap<String, BucketState>>>,

    // Keyed by token hash; never persisted.
    tokens: Arc<RwLock<HashMap<String, IssuedToken>>>,
}

#[derive(Clone, Debug)]
struct IssuedToken {
    user: String,
    expires_at: time::OffsetDateTime,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct BucketState {
    name: String,
    creation_date: String,

    #[serde(default)]
    next_seq: u64,

    // Per key, most recent first.
    #[serde(default)]
    objects: BTreeMap<String, Vec<VersionRecord>>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct VersionRecord {
    version_id: String,

    // Creation order within the bucket; breaks timestamp ties.
    seq: u64,

    size: u64,
    last_modified: String,
    is_latest: bool,
    is_delete_marker: bool,

    #[serde(default)]
    etag: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
